mod backend;
mod config;
mod error;
mod navigation;
mod notice;
mod session;

use iced::{
    widget::{
        button, center, column, container, mouse_area, opaque, row, scrollable, stack, text,
        text_editor, text_input, text_input::Id, Column,
    },
    Color, Element, Length, Task, Theme, Font, Subscription, Size,
    time, clipboard,
    keyboard::{self, Key},
    event::{self, Event as IcedEvent},
    alignment,
    window,
};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use backend::BackendClient;
use error::BackendError;
use navigation::Panel;
use notice::Notice;
use session::{DiaryOutcome, Session};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn init_logging() {
    let level = if std::env::var_os("LIFECAPSULE_DEBUG").is_some() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {}", e);
    }
}

fn main() -> iced::Result {
    init_logging();

    let config = config::Config::load();
    let window_config = config.window.clone();
    tracing::info!(backend = %config.backend.url, "starting LifeCapsule");

    iced::application("LifeCapsule", App::update, App::view)
        .theme(App::theme)
        .subscription(App::subscription)
        .window(window::Settings {
            size: Size::new(window_config.width as f32, window_config.height as f32),
            min_size: Some(Size::new(window_config.min_width as f32, window_config.min_height as f32)),
            position: window::Position::Centered,
            ..Default::default()
        })
        .default_font(Font::MONOSPACE)
        .run_with(move || App::new(&config))
}

#[derive(Debug, Clone)]
enum Message {
    SelectPanel(Panel),
    SidePanelEntered,
    SidePanelLeft,
    DiaryEdited(text_editor::Action),
    SubmitDiary,
    DiarySaved(Result<(), BackendError>),
    QueryChanged(String),
    AskAssistant,
    AnswerReceived(Result<Option<String>, BackendError>),
    DismissNotice,
    CopyAnswer,
    Tick,
}

struct App {
    session: Session,
    client: BackendClient,
    editor: text_editor::Content,
    notice: Option<Notice>,
    loading_frame: usize,
    query_input_id: Id,
}

impl App {
    fn new(config: &config::Config) -> (Self, Task<Message>) {
        let app = App::with_client(BackendClient::with_config(&config.backend));
        (app, Task::none())
    }

    fn with_client(client: BackendClient) -> Self {
        App {
            session: Session::new(),
            client,
            editor: text_editor::Content::new(),
            notice: None,
            loading_frame: 0,
            query_input_id: Id::unique(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::SelectPanel(panel) => {
                self.session.select_panel(panel);
                if panel == Panel::Assistant {
                    text_input::focus(self.query_input_id.clone())
                } else {
                    Task::none()
                }
            }
            Message::SidePanelEntered => {
                self.session.begin_hover();
                Task::none()
            }
            Message::SidePanelLeft => {
                self.session.end_hover();
                Task::none()
            }
            Message::DiaryEdited(action) => {
                let is_edit = action.is_edit();
                self.editor.perform(action);
                if is_edit {
                    self.session.set_diary_draft(self.editor.text());
                }
                Task::none()
            }
            Message::SubmitDiary => match self.session.submit_diary() {
                Some(submission) => {
                    let client = self.client.clone();
                    Task::perform(
                        async move { client.save_diary(&submission.entry).await },
                        Message::DiarySaved,
                    )
                }
                None => Task::none(),
            },
            Message::DiarySaved(result) => {
                if self.session.complete_diary(result) == DiaryOutcome::Saved {
                    self.editor = text_editor::Content::new();
                }
                Task::none()
            }
            Message::QueryChanged(value) => {
                self.session.set_query_draft(value);
                Task::none()
            }
            Message::AskAssistant => match self.session.ask_assistant() {
                Some(query) => {
                    let client = self.client.clone();
                    Task::perform(
                        async move { client.analyze_diary(&query.query).await },
                        Message::AnswerReceived,
                    )
                }
                None => Task::none(),
            },
            Message::AnswerReceived(result) => {
                self.session.complete_query(result);
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
            Message::CopyAnswer => clipboard::write(self.session.answer().to_string()),
            Message::Tick => {
                if self.is_loading() {
                    self.loading_frame = (self.loading_frame + 1) % SPINNER_FRAMES.len();
                }
                Task::none()
            }
        };

        let changes = self.session.take_changes();
        if !changes.is_empty() {
            tracing::trace!(revision = self.session.revision(), ?changes, "session updated");
        }

        self.surface_notice();
        task
    }

    /// Moves the next pending notice into the dialog. While a dialog is open,
    /// newer errors wait in the session's single slot.
    fn surface_notice(&mut self) {
        if self.notice.is_none() {
            self.notice = self.session.next_notice();
        }
    }

    fn is_loading(&self) -> bool {
        self.session.diaries_in_flight() > 0 || self.session.queries_in_flight() > 0
    }

    fn subscription(&self) -> Subscription<Message> {
        let timer = if self.is_loading() {
            time::every(Duration::from_millis(80)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };

        let events = event::listen_with(|event, _status, _id| {
            if let IcedEvent::Keyboard(keyboard::Event::KeyPressed {
                key: Key::Named(keyboard::key::Named::Escape),
                ..
            }) = event
            {
                Some(Message::DismissNotice)
            } else {
                None
            }
        });

        Subscription::batch([timer, events])
    }

    fn view(&self) -> Element<'_, Message> {
        let header = container(text("LifeCapsule").size(26))
            .padding(15)
            .width(Length::Fill);

        let content = match self.session.active_panel() {
            Panel::Diary => self.view_diary(),
            Panel::Assistant => self.view_assistant(),
        };

        let body = row![
            self.view_side_panel(),
            container(content)
                .padding(20)
                .width(Length::Fill)
                .height(Length::Fill),
        ];

        let base: Element<Message> = column![header, body].into();

        match &self.notice {
            Some(notice) => modal(base, view_notice(notice)),
            None => base,
        }
    }

    fn view_side_panel(&self) -> Element<'_, Message> {
        let expanded = self.session.side_panel_expanded();

        let items = Panel::ALL.iter().map(|&panel| -> Element<Message> {
            let label: Element<Message> = if expanded {
                row![text(panel.icon()), text(panel.title())].spacing(10).into()
            } else {
                text(panel.icon()).into()
            };

            let style: fn(&Theme, button::Status) -> button::Style =
                if self.session.active_panel() == panel {
                    button::primary
                } else {
                    button::text
                };

            button(label)
                .on_press(Message::SelectPanel(panel))
                .style(style)
                .padding(10)
                .width(Length::Fill)
                .into()
        });

        let panel = container(Column::with_children(items).spacing(5))
            .padding(10)
            .width(if expanded { Length::Fixed(220.0) } else { Length::Fixed(64.0) })
            .height(Length::Fill)
            .style(container::rounded_box);

        mouse_area(panel)
            .on_enter(Message::SidePanelEntered)
            .on_exit(Message::SidePanelLeft)
            .into()
    }

    fn view_diary(&self) -> Element<'_, Message> {
        let editor = text_editor(&self.editor)
            .placeholder("Write your diary entry here...")
            .on_action(Message::DiaryEdited)
            .padding(10)
            .height(Length::Fill);

        let save = button(text("Save Entry"))
            .on_press_maybe(self.session.can_submit_diary().then_some(Message::SubmitDiary))
            .padding(10);

        let mut controls = row![save].spacing(15).align_y(alignment::Vertical::Center);
        if self.session.diaries_in_flight() > 0 {
            controls = controls.push(self.in_flight_line("Saving your entry..."));
        }

        column![text(Panel::Diary.title()).size(22), editor, controls]
            .spacing(15)
            .into()
    }

    fn view_assistant(&self) -> Element<'_, Message> {
        let input = text_input("Ask something...", self.session.query_draft())
            .on_input(Message::QueryChanged)
            .on_submit(Message::AskAssistant)
            .padding(12)
            .size(16)
            .id(self.query_input_id.clone());

        let ask = button(text("Submit Query"))
            .on_press_maybe(self.session.can_ask_assistant().then_some(Message::AskAssistant))
            .padding(10);

        let mut controls = row![ask].spacing(15).align_y(alignment::Vertical::Center);
        if self.session.queries_in_flight() > 0 {
            controls = controls.push(self.in_flight_line("Reading through your diary..."));
        }

        let answer = scrollable(
            container(text(self.session.answer()).size(15))
                .padding(15)
                .width(Length::Fill),
        )
        .height(Length::Fill);

        let mut content = column![
            text(Panel::Assistant.title()).size(22),
            input,
            controls,
            container(answer)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(container::bordered_box),
        ]
        .spacing(15);

        if !self.session.answer().is_empty() {
            content = content.push(
                container(button(text("[Copy]").size(14)).on_press(Message::CopyAnswer).padding(10))
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Right),
            );
        }

        content.into()
    }

    fn in_flight_line(&self, label: &'static str) -> Element<'_, Message> {
        text(format!("{} {}", SPINNER_FRAMES[self.loading_frame], label))
            .size(14)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::TokyoNight
    }
}

fn view_notice(notice: &Notice) -> Element<'_, Message> {
    container(
        column![
            text(notice.title()).size(20),
            text(notice.message.as_str()).size(15),
            container(button(text("OK")).on_press(Message::DismissNotice).padding(10))
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Right),
        ]
        .spacing(15),
    )
    .padding(20)
    .width(Length::Fixed(420.0))
    .style(container::rounded_box)
    .into()
}

/// Lays `dialog` over `base` and swallows all input aimed at `base`.
fn modal<'a>(base: Element<'a, Message>, dialog: Element<'a, Message>) -> Element<'a, Message> {
    stack![
        base,
        opaque(center(opaque(dialog)).style(|_theme| container::Style {
            background: Some(Color { a: 0.7, ..Color::BLACK }.into()),
            ..container::Style::default()
        })),
    ]
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice::NoticeKind;

    fn app() -> App {
        App::with_client(BackendClient::new("http://127.0.0.1:1"))
    }

    #[test]
    fn test_hover_messages_drive_side_panel() {
        let mut app = app();
        let _ = app.update(Message::SidePanelEntered);
        assert!(app.session.side_panel_expanded());
        let _ = app.update(Message::SidePanelLeft);
        assert!(!app.session.side_panel_expanded());
    }

    #[test]
    fn test_select_panel_switches_view() {
        let mut app = app();
        let _ = app.update(Message::SelectPanel(Panel::Assistant));
        assert_eq!(app.session.active_panel(), Panel::Assistant);
        let _ = app.update(Message::SelectPanel(Panel::Assistant));
        assert_eq!(app.session.active_panel(), Panel::Assistant);
    }

    #[test]
    fn test_blank_query_issues_nothing() {
        let mut app = app();
        let _ = app.update(Message::QueryChanged("   ".into()));
        let _ = app.update(Message::AskAssistant);
        assert_eq!(app.session.queries_in_flight(), 0);
    }

    #[test]
    fn test_saved_diary_resets_editor_and_opens_dialog() {
        let mut app = app();
        app.session.set_diary_draft("Today was good.");
        app.editor = text_editor::Content::with_text("Today was good.");
        let _ = app.update(Message::SubmitDiary);
        assert_eq!(app.session.diaries_in_flight(), 1);

        let _ = app.update(Message::DiarySaved(Ok(())));
        assert_eq!(app.session.diary_draft(), "");
        assert!(app.editor.text().trim().is_empty());
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Success));
    }

    #[test]
    fn test_errors_wait_while_dialog_is_open() {
        let mut app = app();
        app.session.set_query_draft("X");
        let _ = app.update(Message::AskAssistant);
        let _ = app.update(Message::AskAssistant);

        let _ = app.update(Message::AnswerReceived(Err(BackendError::Timeout)));
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
        assert_eq!(app.session.pending_error(), None);

        let _ = app.update(Message::AnswerReceived(Err(BackendError::Rejected { status: 502 })));
        assert!(app.session.pending_error().is_some());

        let _ = app.update(Message::DismissNotice);
        let shown = app.notice.as_ref().unwrap();
        assert!(shown.message.contains("502"));
        assert_eq!(app.session.pending_error(), None);

        let _ = app.update(Message::DismissNotice);
        assert!(app.notice.is_none());
    }
}
