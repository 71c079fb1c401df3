use iced::widget::image::Handle;
use iced::widget::{button, column, container, progress_bar, row, stack, text, Column};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use reqwest::Url;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod media;
mod state;
mod submit;
mod ui;

use config::Config;
use media::camera::{request_stream, CameraSession, CameraState, CaptureDevice, CaptureError, StreamHandle};
use media::photo::{load_photo_file, LoadedPhoto, PhotoError, Preview};
use state::session::{Transition, WizardSession};
use submit::{SubmissionClient, SubmissionOutcome, SubmissionPayload, SubmitError};

/// How often the live camera preview refreshes
const CAMERA_FRAME_INTERVAL: Duration = Duration::from_millis(66);

/// Which top-level screen is showing
#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Wizard,
    /// Submission accepted; the wizard is done
    Results(Url),
}

/// Main application state
struct IntakeWizard {
    /// Steps, field store, photo, submission slot
    session: WizardSession,
    camera: CameraSession,
    device: Arc<dyn CaptureDevice>,
    config: Config,
    /// None when the backend configuration is unusable
    client: Option<SubmissionClient>,
    screen: Screen,
    /// User-facing message shown in the notice banner
    notice: Option<String>,
    /// Rendered photo preview
    photo_handle: Option<Handle>,
    /// Latest live camera frame
    camera_handle: Option<Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Text typed into a text control
    TextChanged(String, String),
    /// Value chosen from a select control
    SelectChanged(String, String),
    /// Checkbox toggled
    CheckboxToggled(String, bool),
    /// Option card clicked
    OptionSelected {
        group: String,
        field: String,
        value: String,
    },
    Next,
    Back,
    /// User clicked "Upload photo"
    PickPhoto,
    PhotoPicked(Option<PathBuf>),
    PhotoLoaded(Result<LoadedPhoto, PhotoError>),
    /// User clicked "Use camera"
    OpenCamera,
    CameraReady(Result<StreamHandle, CaptureError>),
    CameraTick,
    CapturePhoto,
    CancelCamera,
    /// User confirmed on the final step
    Submit,
    Submitted(Result<Url, SubmitError>),
    DismissNotice,
}

impl IntakeWizard {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();

        let client = match SubmissionClient::new(&config) {
            Ok(client) => {
                info!("🎨 Style intake ready, submitting to {}", client.submit_url());
                Some(client)
            }
            Err(e) => {
                warn!("⚠️  {}", e);
                None
            }
        };

        (
            IntakeWizard {
                session: WizardSession::new(),
                camera: CameraSession::new(),
                device: media::default_device(),
                config,
                client,
                screen: Screen::Wizard,
                notice: None,
                photo_handle: None,
                camera_handle: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TextChanged(field, value) | Message::SelectChanged(field, value) => {
                self.session.set_value(&field, &value);
                Task::none()
            }
            Message::CheckboxToggled(field, checked) => {
                self.session.set_checked(&field, checked);
                Task::none()
            }
            Message::OptionSelected { group, field, value } => {
                self.session.select_option(&group, &field, &value);
                Task::none()
            }
            Message::Next => {
                match self.session.advance() {
                    Ok(Transition::Moved { from, to }) => {
                        info!("➡️  Step {} -> {} ({:.0}%)", from, to, self.session.progress());
                        self.notice = None;
                    }
                    Ok(Transition::Stayed) => self.notice = None,
                    Err(e) => self.notice = Some(e.to_string()),
                }
                Task::none()
            }
            Message::Back => {
                if self.session.retreat() {
                    self.notice = None;
                }
                Task::none()
            }
            Message::PickPhoto => Task::perform(pick_photo(), Message::PhotoPicked),
            Message::PhotoPicked(Some(path)) => {
                Task::perform(load_photo_file(path, self.config.preview_size), Message::PhotoLoaded)
            }
            Message::PhotoPicked(None) => Task::none(),
            Message::PhotoLoaded(Ok(photo)) => {
                self.install_photo(photo);
                Task::none()
            }
            Message::PhotoLoaded(Err(e)) => {
                // The previous photo, if any, stays in place
                warn!("⚠️  {}", e);
                self.notice = Some(e.to_string());
                Task::none()
            }
            Message::OpenCamera => {
                if !self.camera.begin_request() {
                    return Task::none();
                }
                self.camera_handle = None;
                Task::perform(request_stream(self.device.clone()), Message::CameraReady)
            }
            Message::CameraReady(result) => {
                self.camera.stream_ready(result);
                self.surface_camera_error();
                Task::none()
            }
            Message::CameraTick => {
                if let Some(frame) = self.camera.poll_frame() {
                    self.camera_handle = Some(Handle::from_rgba(
                        frame.width(),
                        frame.height(),
                        frame.as_raw().clone(),
                    ));
                }
                self.surface_camera_error();
                Task::none()
            }
            Message::CapturePhoto => {
                match self.camera.capture(self.config.preview_size) {
                    Ok(photo) => self.install_photo(photo),
                    Err(e) => {
                        self.notice = Some(e.to_string());
                        self.camera.dismiss_error();
                    }
                }
                self.camera_handle = None;
                Task::none()
            }
            Message::CancelCamera => {
                self.camera.cancel();
                self.camera_handle = None;
                Task::none()
            }
            Message::Submit => {
                let Some(client) = self.client.clone() else {
                    self.notice = Some("The backend address is not configured correctly".to_string());
                    return Task::none();
                };
                // Ignore repeated confirmations while a request is in flight
                if !self.session.begin_submission() {
                    return Task::none();
                }
                self.notice = None;
                let payload = SubmissionPayload::from_session(&self.session);
                Task::perform(client.submit(payload), Message::Submitted)
            }
            Message::Submitted(result) => {
                match submit::settle(&mut self.session, result) {
                    SubmissionOutcome::Navigate(url) => {
                        info!("🧭 Navigating to {}", url);
                        self.screen = Screen::Results(url);
                    }
                    SubmissionOutcome::Failed(message) => self.notice = Some(message),
                }
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    /// Replace the photo and its rendered preview
    fn install_photo(&mut self, photo: LoadedPhoto) {
        self.photo_handle = photo.preview.as_ref().map(preview_handle);
        self.session.install_photo(photo);
    }

    /// Move a camera error into the notice banner and reset the camera
    fn surface_camera_error(&mut self) {
        if let CameraState::Error(message) = self.camera.state() {
            self.notice = Some(message.clone());
            self.camera.dismiss_error();
            self.camera_handle = None;
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let page = match &self.screen {
            Screen::Wizard => self.wizard_view(),
            Screen::Results(url) => ui::overlay::results(url),
        };

        let mut layers = stack![page];
        if self.camera.is_open() {
            layers = layers.push(ui::overlay::camera(&self.camera, self.camera_handle.as_ref()));
        }
        if self.session.is_submitting() {
            layers = layers.push(ui::overlay::loading());
        }
        layers.into()
    }

    fn wizard_view(&self) -> Element<Message> {
        let session = &self.session;

        let header = column![
            text(session.step_counter()).size(16),
            progress_bar(0.0..=100.0, session.progress()).height(8),
        ]
        .spacing(8);

        let mut content: Column<Message> = column![header].spacing(24).padding(40).max_width(720);

        if let Some(notice) = &self.notice {
            content = content.push(ui::overlay::notice(notice));
        }

        // Only the active step is rendered
        content = content.push(ui::step::panel(session, self.photo_handle.as_ref()));

        let back = button("Back")
            .padding(10)
            .style(button::secondary)
            .on_press_maybe((session.current_step() > 1 && !session.is_submitting()).then_some(Message::Back));

        let forward = if session.is_terminal() {
            button("Confirm and submit")
                .padding(10)
                .on_press_maybe((!session.is_submitting()).then_some(Message::Submit))
        } else {
            button("Next").padding(10).on_press(Message::Next)
        };

        content = content.push(row![back, forward].spacing(12).align_y(Alignment::Center));

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.camera.is_live() {
            iced::time::every(CAMERA_FRAME_INTERVAL).map(|_| Message::CameraTick)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn preview_handle(preview: &Preview) -> Handle {
    Handle::from_rgba(preview.width, preview.height, preview.rgba.clone())
}

/// Show the native file picker for a photo
async fn pick_photo() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Choose a profile photo")
        .add_filter("Images", &["jpg", "jpeg", "png", "webp"])
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    iced::application(
        "Style Intake",
        IntakeWizard::update,
        IntakeWizard::view,
    )
    .subscription(IntakeWizard::subscription)
    .theme(IntakeWizard::theme)
    .centered()
    .run_with(IntakeWizard::new)
}
