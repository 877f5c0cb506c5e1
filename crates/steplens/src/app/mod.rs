//! Application state and logic

use crate::config::{Config, ResolvedTheme};
use ratatui::layout::Rect;
use steplens_core::{Geometry, RequestId, StepNavigator, StepStore, StoreUpdate, PANEL_COUNT};
use tui_textarea::TextArea;

mod input;
mod scroll;
mod worker;

pub(crate) use worker::{DecompileWorker, WorkerRequest, WorkerResponse};

const WORKER_STOPPED: &str = "decompiler stopped";

/// Which part of the screen receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The source editor; keys never reach step navigation
    Editor,
    Steps,
}

/// Layout settings taken from the config
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub gap_width: u16,
    pub mini_width: u16,
    pub mini_height: u16,
    pub editor_height: u16,
    pub show_guides: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        let ui = crate::config::UiConfig::default();
        Self {
            gap_width: ui.gap_width,
            mini_width: ui.mini_width,
            mini_height: ui.mini_height,
            editor_height: ui.editor_height,
            show_guides: ui.show_guides,
        }
    }
}

/// The main application state
pub struct App {
    /// Steps and changes of the latest result
    pub store: StepStore,
    /// Current step, panel offsets, mini view
    pub nav: StepNavigator,
    /// Source text input
    pub editor: TextArea<'static>,
    pub focus: Focus,
    pub geometry: Geometry,
    pub view: ViewSettings,
    pub theme: ResolvedTheme,
    /// Whether to show the help popover
    pub show_help: bool,
    /// Whether to quit
    pub should_quit: bool,
    /// Last backend error, shown in the status bar
    pub error_message: Option<String>,
    /// Waiting for the initial source text
    pub loading_initial: bool,
    /// Panel content areas from the last render (mouse hit testing, scroll clamping)
    pub panel_areas: [Option<Rect>; PANEL_COUNT],
    /// Ministep areas from the last render
    pub ministep_areas: Vec<(Rect, usize)>,
    worker: Option<DecompileWorker>,
}

impl App {
    pub fn new(geometry: Geometry, view: ViewSettings, theme: ResolvedTheme) -> Self {
        Self {
            store: StepStore::new(),
            nav: StepNavigator::default(),
            editor: new_editor(Vec::new()),
            focus: Focus::Steps,
            geometry,
            view,
            theme,
            show_help: false,
            should_quit: false,
            error_message: None,
            loading_initial: false,
            panel_areas: [None; PANEL_COUNT],
            ministep_areas: Vec::new(),
            worker: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let ui = &config.ui;
        Self::new(
            config.geometry.geometry(),
            ViewSettings {
                gap_width: ui.gap_width.max(3),
                mini_width: ui.mini_width.max(4),
                mini_height: ui.mini_height.max(3),
                editor_height: ui.editor_height.max(3),
                show_guides: ui.show_guides,
            },
            ui.theme.resolve(),
        )
    }

    /// Attach the decompiler worker and ask it for the initial source
    pub(crate) fn attach_worker(&mut self, worker: DecompileWorker) {
        self.loading_initial = worker.send(WorkerRequest::InitialCode);
        self.worker = Some(worker);
    }

    /// Current source text
    pub fn source(&self) -> String {
        self.editor.lines().join("\n")
    }

    pub fn set_source(&mut self, source: &str) {
        let lines = source.lines().map(str::to_string).collect();
        self.editor = new_editor(lines);
    }

    /// Start decompiling the editor contents. Supersedes any pending request.
    pub fn request_decompile(&mut self) -> RequestId {
        let id = self.store.begin_request();
        self.error_message = None;
        let source = self.source();
        let sent = match &self.worker {
            Some(worker) => worker.send(WorkerRequest::Decompile { id, source }),
            None => true,
        };
        if !sent {
            tracing::error!("decompile worker is gone");
            self.fail_request(id, WORKER_STOPPED);
        }
        id
    }

    /// Settle `id` as failed: the store is cleared and navigation reset
    fn fail_request(&mut self, id: RequestId, message: &str) {
        if let StoreUpdate::Cleared { message } = self.store.complete(id, Err(message)) {
            self.nav.on_new_result(0);
            self.error_message = Some(format!("Decompile failed: {message}"));
        }
    }

    /// Apply every response the worker has produced since the last tick
    pub fn tick(&mut self) {
        // Liveness is read before draining so a response sent just before
        // the thread exited is still applied
        let (alive, responses) = match &self.worker {
            Some(worker) => (worker.is_alive(), worker.try_recv_all()),
            None => return,
        };
        for resp in responses {
            self.handle_response(resp);
        }
        if !alive {
            self.loading_initial = false;
            if let Some(id) = self.store.pending_request() {
                tracing::error!(request = %id, "decompile worker is gone");
                self.fail_request(id, WORKER_STOPPED);
            }
        }
    }

    pub(crate) fn handle_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::InitialCode(result) => {
                self.loading_initial = false;
                match result {
                    Ok(code) => {
                        self.set_source(&code);
                        self.request_decompile();
                    }
                    Err(err) => {
                        tracing::error!(%err, "failed to load initial code");
                        self.error_message = Some(format!("Failed to load initial code: {err}"));
                    }
                }
            }
            WorkerResponse::Steps { id, result } => match self.store.complete(id, result) {
                StoreUpdate::Stale => {}
                StoreUpdate::Replaced { steps } => {
                    for (idx, err) in self.store.steps().malformed_changes() {
                        tracing::warn!(change = idx, %err, "malformed change in result");
                    }
                    self.nav.on_new_result(steps);
                    self.error_message = None;
                }
                StoreUpdate::Cleared { message } => {
                    self.nav.on_new_result(0);
                    self.error_message = Some(format!("Decompile failed: {message}"));
                }
            },
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Steps,
            Focus::Steps => Focus::Editor,
        };
    }
}

fn new_editor(lines: Vec<String>) -> TextArea<'static> {
    let mut editor = TextArea::new(lines);
    editor.set_cursor_line_style(ratatui::style::Style::default());
    editor
}
