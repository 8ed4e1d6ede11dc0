//! A small built-in catalogue of sample programs, used by the TUI's program
//! switcher and as runnable documentation. Sources are embedded as string
//! literals rather than loaded from disk, so the catalogue has no runtime
//! dependency on where the binary is installed.

use std::sync::OnceLock;

use crate::parser::parse;
use crate::program::Program;

const DEMO_SOURCES: [(&str, &str, &[u64]); 3] = [
    (
        "Increment",
        "
name: Increment.
inputs: 1.
init: scan.
scan:
  1 -> right, scan.
  blank -> 1, halt.
",
        &[3],
    ),
    (
        "Two-argument sum",
        "
name: Sum.
inputs: 2.
init: seek_gap.
seek_gap:
  1 -> right, seek_gap.
  blank -> 1, seek_end.
seek_end:
  1 -> right, seek_end.
  blank -> left, erase.
erase:
  1 -> blank, halt.
",
        &[2, 3],
    ),
    (
        "Eraser",
        "
name: Eraser.
inputs: 1.
init: wipe.
wipe:
  1 -> blank, advance.
  blank -> right, halt.
advance:
  blank -> right, wipe.
",
        &[5],
    ),
];

static DEMOS: OnceLock<Vec<Program>> = OnceLock::new();

/// Every embedded source is fixed at compile time and known-valid; a parse
/// failure here is a defect in this module, not a reachable runtime
/// condition, so it is treated as fatal rather than threaded through a
/// `Result`.
fn demos() -> &'static [Program] {
    DEMOS
        .get_or_init(|| {
            DEMO_SOURCES
                .iter()
                .map(|(name, source, _)| {
                    parse(source).unwrap_or_else(|e| panic!("built-in demo '{name}' failed to parse: {e}"))
                })
                .collect()
        })
        .as_slice()
}

/// Read-only catalogue of the built-in demo programs.
pub struct DemoRegistry;

impl DemoRegistry {
    pub fn count() -> usize {
        demos().len()
    }

    pub fn by_index(index: usize) -> Option<Program> {
        demos().get(index).cloned()
    }

    pub fn by_name(name: &str) -> Option<Program> {
        demos().iter().find(|p| p.name().eq_ignore_ascii_case(name)).cloned()
    }

    pub fn names() -> Vec<String> {
        demos().iter().map(|p| p.name().to_string()).collect()
    }

    /// The bootstrap input vector that best demonstrates the demo at
    /// `index`, or `None` if the index is out of range.
    pub fn default_inputs(index: usize) -> Option<Vec<u64>> {
        DEMO_SOURCES.get(index).map(|(_, _, inputs)| inputs.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_demos_parse_successfully() {
        assert_eq!(DemoRegistry::count(), DEMO_SOURCES.len());
    }

    #[test]
    fn demo_names_are_listed_in_source_order() {
        assert_eq!(DemoRegistry::names(), vec!["Increment", "Two-argument sum", "Eraser"]);
    }

    #[test]
    fn by_name_is_case_insensitive() {
        assert!(DemoRegistry::by_name("eraser").is_some());
        assert!(DemoRegistry::by_name("ERASER").is_some());
        assert!(DemoRegistry::by_name("nonexistent").is_none());
    }

    #[test]
    fn by_index_out_of_range_is_none() {
        assert!(DemoRegistry::by_index(999).is_none());
    }

    #[test]
    fn default_inputs_match_each_demo_arity() {
        for i in 0..DemoRegistry::count() {
            let program = DemoRegistry::by_index(i).unwrap();
            let inputs = DemoRegistry::default_inputs(i).unwrap();
            assert_eq!(inputs.len() as u64, program.num_inputs());
        }
    }
}
