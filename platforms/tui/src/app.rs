use action::Action;
use keymap::{Config, KeyMapConfig};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, Padding, Paragraph, Wrap},
    Frame,
};
use tur::{halted, step, program::Action as ClauseOutcome, DemoRegistry, Machine, Program, ProgramLoader};

const BLOCK_PADDING: Padding = Padding::new(1, 1, 0, 0);
const MIN_TAPE_RADIUS: i64 = 5;
const MAX_TAPE_RADIUS: i64 = 40;
const DEFAULT_TAPE_RADIUS: i64 = 15;
/// Display-only stand-in for the tape's blank byte (0x20); rendering an
/// actual space inline is indistinguishable from the surrounding padding.
const DISPLAY_BLANK: char = '_';

pub struct App {
    program: Program,
    inputs: Vec<u64>,
    machine: Machine,
    step_count: usize,
    current_demo_index: usize,
    auto_play: bool,
    tape_radius: i64,
    message: String,
    show_help: bool,
    pub(crate) keymap: Config<Action>,
    // Indicates if the program was loaded from a file/stdin, disabling demo switching.
    program_loaded_from_source: bool,
}

impl App {
    pub fn new_default() -> Self {
        let program = DemoRegistry::by_index(0).expect("built-in demo catalogue is non-empty");
        let inputs = DemoRegistry::default_inputs(0).unwrap_or_default();
        let machine = Machine::new(&program, &inputs).expect("demo inputs match demo arity");

        Self {
            program,
            inputs,
            machine,
            step_count: 0,
            keymap: Action::keymap_config(),
            current_demo_index: 0,
            auto_play: false,
            tape_radius: DEFAULT_TAPE_RADIUS,
            message: "Press 'h' for help.".to_string(),
            show_help: false,
            program_loaded_from_source: false,
        }
    }

    pub fn new_from_program_string(content: String, inputs: Vec<u64>) -> Result<Self, String> {
        let program = ProgramLoader::load_program_from_string(&content).map_err(|e| e.to_string())?;
        let machine = Machine::new(&program, &inputs).map_err(|e| e.to_string())?;

        Ok(Self {
            program,
            inputs,
            machine,
            step_count: 0,
            keymap: Action::keymap_config(),
            current_demo_index: 0,
            auto_play: false,
            tape_radius: DEFAULT_TAPE_RADIUS,
            message: "Program loaded from source. Press 'h' for help.".to_string(),
            show_help: false,
            program_loaded_from_source: true,
        })
    }

    pub fn render(&mut self, f: &mut Frame) {
        let margin_size = Margin::new(1, 0);
        let inner_area = f.area().inner(margin_size);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Program info
                Constraint::Min(0),    // Middle section
                Constraint::Length(3), // Status/controls
            ])
            .split(inner_area);

        self.render_program_info(f, main_chunks[0]);

        let middle_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[1]);

        self.render_tape(f, middle_chunks[0]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(middle_chunks[1]);

        self.render_machine_state(f, right_chunks[0]);

        if self.show_help {
            self.render_help(f, right_chunks[1]);
        } else {
            self.render_rules(f, right_chunks[1]);
        }

        self.render_status(f, main_chunks[2]);
    }

    fn render_program_info(&self, f: &mut Frame, area: Rect) {
        let mut text = vec![Line::from(vec![
            Span::styled("Program: ", Style::default().fg(Color::Yellow)),
            Span::raw(if self.program_loaded_from_source {
                format!("{} (custom)", self.program.name())
            } else {
                format!(
                    "{} ({}/{})",
                    self.program.name(),
                    self.current_demo_index + 1,
                    DemoRegistry::count()
                )
            }),
        ])];

        let inputs_display: String = self
            .inputs
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        text.push(Line::from(vec![
            Span::styled("Inputs: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("[{inputs_display}]")),
        ]));

        text.push(Line::from(vec![
            Span::styled("States: ", Style::default().fg(Color::Yellow)),
            Span::raw(self.program.num_states().to_string()),
        ]));

        let paragraph = Paragraph::new(text)
            .block(block("Tur - Turing Machine Language (TUI)").title_alignment(Alignment::Center));

        f.render_widget(paragraph, area);
    }

    fn render_tape(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for offset in -self.tape_radius..=self.tape_radius {
            let raw = self.machine.peek(offset);
            let symbol = if raw == tur::BLANK { DISPLAY_BLANK } else { raw as char };

            if offset == 0 {
                spans.push(Span::styled(
                    format!(" {symbol} "),
                    Style::default()
                        .bg(Color::Yellow)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(format!(" {symbol} "), Style::default()));
            }
        }

        let mut lines = vec![Line::from(spans)];
        lines.push(Line::from(Span::styled(
            format!(
                "Head at offset {} (symbol: '{}')",
                self.machine.head_position(),
                self.machine.read() as char
            ),
            Style::default().fg(Color::Cyan),
        )));

        let paragraph = section("Tape", lines).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_machine_state(&self, f: &mut Frame, area: Rect) {
        let is_halted = halted(&self.machine);
        let (status_text, status_color) = if is_halted {
            ("HALTED", Color::Red)
        } else if self.step_count == 0 {
            ("READY", Color::Blue)
        } else {
            ("RUNNING", Color::Green)
        };

        let state_label = self
            .machine
            .current_state()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "<error>".to_string());

        let text = vec![Line::from(vec![
            Span::styled("Current State: ", Style::default().fg(Color::Yellow)),
            Span::styled(state_label, Style::default().fg(status_color).add_modifier(Modifier::BOLD)),
            Span::styled(" | Steps: ", Style::default().fg(Color::Yellow)),
            Span::raw(self.step_count.to_string()),
            Span::styled(" | Status: ", Style::default().fg(Color::Yellow)),
            Span::styled(status_text, Style::default().fg(status_color)),
        ])];

        f.render_widget(section("Machine State", text), area);
    }

    fn render_rules(&self, f: &mut Frame, area: Rect) {
        let mut items = Vec::new();

        let Some(state) = self.machine.current_state() else {
            items.push(ListItem::new(Line::from("Machine is in the error-halt state.")));
            f.render_widget(list(items), area);
            return;
        };

        items.push(ListItem::new(Line::from(vec![
            Span::styled("State: ", Style::default().fg(Color::Yellow)),
            Span::raw(state.to_string()),
        ])));
        items.push(ListItem::new(Line::from("")));

        match self.program.clauses(state) {
            Some(clauses) if !clauses.is_empty() => {
                items.push(ListItem::new(Line::from("Rules:")));
                for clause in clauses {
                    let input = display_byte(clause.input);
                    let action = match clause.action.into() {
                        ClauseOutcome::MoveLeft => "left".to_string(),
                        ClauseOutcome::MoveRight => "right".to_string(),
                        ClauseOutcome::Print(b) => format!("print '{}'", display_byte(b)),
                        ClauseOutcome::Error => unreachable!("clauses never declare Error"),
                    };
                    items.push(ListItem::new(Line::from(format!(
                        "  '{input}' -> {action}, {}",
                        clause.successor
                    ))));
                }
            }
            _ => items.push(ListItem::new(Line::from("No declared state (run-time error halt)."))),
        }

        f.render_widget(list(items), area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from("Controls:"),
            Line::from("  Space - Step forward"),
            Line::from("  r - Reset machine"),
            Line::from("  p - Toggle auto-play"),
            Line::from(if self.program_loaded_from_source {
                "  <-/-> - Demo switching disabled (loaded from file/stdin)"
            } else {
                "  <-/-> - Switch demo program"
            }),
            Line::from("  Up/Down - Widen/narrow the tape window"),
            Line::from("  h - Toggle this help"),
            Line::from("  q - Quit"),
            Line::from(""),
            Line::from("The highlighted cell is the head. '_' marks a blank cell."),
        ];

        f.render_widget(section("Help", help_text), area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let repo = "@rezigned/tur";
        let outer = block("Status");
        let inner = outer.inner(area);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(repo.len() as u16)])
            .split(inner);

        let auto_play_status = if self.auto_play { "ON" } else { "OFF" };
        let status = Line::from(vec![
            Span::raw("Auto-play: "),
            Span::styled(auto_play_status, Style::default().fg(Color::Yellow)),
            Span::raw(format!(" | {}", self.message)),
        ]);

        let social = Text::from(Line::from(Span::styled(repo, Style::default().fg(Color::Yellow))).right_aligned());

        f.render_widget(outer, area);
        f.render_widget(status, chunks[0]);
        f.render_widget(social, chunks[1]);
    }

    pub fn step_machine(&mut self) {
        if halted(&self.machine) {
            self.message = "Machine is halted. Press 'r' to reset.".to_string();
            self.auto_play = false;
            return;
        }

        step(&mut self.machine, &self.program);
        self.step_count += 1;

        self.message = if halted(&self.machine) {
            self.auto_play = false;
            match self.machine.current_state() {
                Some(_) => "Machine halted.".to_string(),
                None => "Machine halted with an error (no matching clause).".to_string(),
            }
        } else {
            format!("Step {} completed", self.step_count)
        };
        tracing::debug!(step = self.step_count, state = ?self.machine.current_state(), "stepped");
    }

    pub fn reset_machine(&mut self) {
        self.machine = Machine::new(&self.program, &self.inputs).expect("inputs already validated");
        self.step_count = 0;
        self.message = "Machine reset".to_string();
        self.auto_play = false;
    }

    pub fn toggle_auto_play(&mut self) {
        self.auto_play = !self.auto_play;
        self.message = format!("Auto-play {}", if self.auto_play { "enabled" } else { "disabled" });
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play && !halted(&self.machine)
    }

    pub fn next_program(&mut self) {
        if self.program_loaded_from_source {
            self.message = "Cannot switch programs when loaded from file/stdin.".to_string();
            return;
        }
        let count = DemoRegistry::count();
        self.current_demo_index = (self.current_demo_index + 1) % count;
        self.load_current_demo();
    }

    pub fn previous_program(&mut self) {
        if self.program_loaded_from_source {
            self.message = "Cannot switch programs when loaded from file/stdin.".to_string();
            return;
        }
        let count = DemoRegistry::count();
        self.current_demo_index = if self.current_demo_index == 0 {
            count - 1
        } else {
            self.current_demo_index - 1
        };
        self.load_current_demo();
    }

    fn load_current_demo(&mut self) {
        let program = DemoRegistry::by_index(self.current_demo_index).expect("index is modulo count()");
        let inputs = DemoRegistry::default_inputs(self.current_demo_index).unwrap_or_default();
        let machine = Machine::new(&program, &inputs).expect("demo inputs match demo arity");

        self.message = format!("Loaded demo: {}", program.name());
        self.program = program;
        self.inputs = inputs;
        self.machine = machine;
        self.step_count = 0;
        self.auto_play = false;
    }

    pub fn widen_tape_view(&mut self) {
        self.tape_radius = (self.tape_radius + 5).min(MAX_TAPE_RADIUS);
    }

    pub fn narrow_tape_view(&mut self) {
        self.tape_radius = (self.tape_radius - 5).max(MIN_TAPE_RADIUS);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

fn display_byte(b: u8) -> char {
    if b == tur::BLANK {
        DISPLAY_BLANK
    } else {
        b as char
    }
}

fn section<'a>(title: &'a str, content: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(content).block(block(title))
}

fn list(items: Vec<ListItem>) -> List {
    List::new(items)
        .block(block("State Information"))
        .style(Style::default().fg(Color::White))
}

fn block(title: &str) -> Block {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {title} "))
        .padding(BLOCK_PADDING)
}
