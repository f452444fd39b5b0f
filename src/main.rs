use iced::keyboard::{self, key};
use iced::time::{self, Instant};
use iced::widget::image::Handle;
use iced::widget::scrollable::{self, RelativeOffset};
use iced::widget::{column, container, stack, text};
use iced::{Color, Element, Length, Subscription, Task, Theme};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

mod config;
mod logging;
mod media;
mod notice;
mod service;
mod state;
mod ui;

use media::DecodedImage;
use media::MediaError;
use notice::NoticeBoard;
use service::{PixabayClient, SearchError};
use state::data::{ImageId, SearchPage};
use state::overlay::ScrollLock;
use state::search::{Effect, FetchTicket, SearchController, Transition};
use ui::gallery::{Footer, ScrollTrigger};

/// How often expired notices are swept while any are visible
const NOTICE_SWEEP_INTERVAL: Duration = Duration::from_millis(250);

/// Main application state
struct PixelFinder {
    /// Query/pagination state machine
    search: SearchController,
    /// Current contents of the search field
    input: String,
    /// Toasts on screen
    notices: NoticeBoard,
    /// Edge trigger for loading more on scroll
    scroll_trigger: ScrollTrigger,
    /// Shared HTTP client for image downloads
    http: reqwest::Client,
    /// Decoded thumbnails for the current results
    thumbnails: HashMap<ImageId, Handle>,
    /// Thumbnails already requested, so each is downloaded once
    requested: HashSet<ImageId>,
    /// Full-size rendition for the open overlay
    full_size: Option<(ImageId, Handle)>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Search field edited
    InputChanged(String),
    /// Search button pressed or Enter in the field
    Submit,
    /// "Load more" button pressed
    LoadMore,
    /// A search request finished
    Fetched(FetchTicket, Result<SearchPage, SearchError>),
    ThumbnailLoaded(ImageId, Result<DecodedImage, MediaError>),
    FullSizeLoaded(ImageId, Result<DecodedImage, MediaError>),
    /// Gallery scrolled, with the new relative vertical offset
    GalleryScrolled(f32),
    /// Gallery tile clicked
    OpenImage(ImageId),
    /// Escape pressed or backdrop clicked
    CloseOverlay,
    /// Periodic notice expiry sweep
    Tick(Instant),
}

impl PixelFinder {
    /// Create a new instance of the application
    fn new(settings: &config::Settings, http: reqwest::Client) -> (Self, Task<Message>) {
        let client = PixabayClient::new(http.clone(), settings);

        (
            PixelFinder {
                search: SearchController::new(Arc::new(client), ScrollLock::new()),
                input: String::new(),
                notices: NoticeBoard::new(),
                scroll_trigger: ScrollTrigger::default(),
                http,
                thumbnails: HashMap::new(),
                requested: HashSet::new(),
                full_size: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::InputChanged(value) => {
                self.input = value;
                Task::none()
            }
            Message::Submit => {
                let transition = self.search.submit(&self.input);
                let starts_fresh = transition
                    .fetch
                    .as_ref()
                    .is_some_and(|fetch| fetch.ticket.fresh);
                if starts_fresh {
                    // Previous results are gone; so are their pictures
                    self.thumbnails.clear();
                    self.requested.clear();
                    self.full_size = None;
                    self.scroll_trigger.rearm();
                }
                self.apply(transition)
            }
            Message::LoadMore => {
                let transition = self.search.load_more();
                self.apply(transition)
            }
            Message::Fetched(ticket, result) => {
                let transition = self.search.complete(ticket, result);
                let effects = self.apply(transition);
                Task::batch([effects, self.request_thumbnails()])
            }
            Message::ThumbnailLoaded(id, result) => {
                match result {
                    Ok(decoded) if self.search.contains(id) => {
                        self.thumbnails.insert(id, to_handle(decoded));
                    }
                    Ok(_) => debug!(image_id = id, "dropping thumbnail for discarded result"),
                    Err(err) => warn!(image_id = id, %err, "thumbnail failed"),
                }
                Task::none()
            }
            Message::FullSizeLoaded(id, result) => {
                let showing = self.search.overlay().current().map(|image| image.id);
                if showing != Some(id) {
                    debug!(image_id = id, "dropping full-size image for closed overlay");
                    return Task::none();
                }
                match result {
                    Ok(decoded) => self.full_size = Some((id, to_handle(decoded))),
                    Err(err) => {
                        warn!(image_id = id, %err, "full-size image failed, showing thumbnail");
                        if let Some(handle) = self.thumbnails.get(&id) {
                            self.full_size = Some((id, handle.clone()));
                        }
                    }
                }
                Task::none()
            }
            Message::GalleryScrolled(relative_y) => {
                if self.search.overlay().is_scroll_suppressed() {
                    return Task::none();
                }
                if self.scroll_trigger.update(relative_y) && self.search.can_load_more() {
                    let transition = self.search.load_more();
                    return self.apply(transition);
                }
                Task::none()
            }
            Message::OpenImage(id) => {
                let Some(image) = self.search.open_image(id) else {
                    return Task::none();
                };
                let url = image.full_size_url.clone();
                self.full_size = None;
                Task::perform(media::preview::load_full_size(self.http.clone(), url), move |result| {
                    Message::FullSizeLoaded(id, result)
                })
            }
            Message::CloseOverlay => {
                self.search.close_overlay();
                self.full_size = None;
                Task::none()
            }
            Message::Tick(now) => {
                self.notices.prune(now);
                Task::none()
            }
        }
    }

    /// Carry out what the search controller asked for
    fn apply(&mut self, transition: Transition) -> Task<Message> {
        let mut tasks = Vec::new();

        for effect in transition.effects {
            match effect {
                Effect::Notify(notice) => self.notices.push(notice, Instant::now()),
                Effect::RevealNewContent => {
                    // The snap lands at the bottom; it must not count as reaching it
                    self.scroll_trigger.disarm();
                    tasks.push(scrollable::snap_to(ui::gallery::scroll_id(), RelativeOffset::END));
                }
            }
        }

        if let Some(fetch) = transition.fetch {
            tasks.push(Task::perform(fetch.run(), |(ticket, result)| {
                Message::Fetched(ticket, result)
            }));
        }

        Task::batch(tasks)
    }

    /// Start downloads for result thumbnails not requested yet
    fn request_thumbnails(&mut self) -> Task<Message> {
        let mut tasks = Vec::new();
        for image in self.search.images() {
            if !self.requested.insert(image.id) {
                continue;
            }
            let id = image.id;
            tasks.push(Task::perform(
                media::thumbnail::load_thumbnail(self.http.clone(), image.clone()),
                move |result| Message::ThumbnailLoaded(id, result),
            ));
        }
        Task::batch(tasks)
    }

    /// What goes below the gallery grid
    fn footer(&self) -> Footer {
        if self.search.is_loading() {
            Footer::Loading
        } else if self.search.can_load_more() {
            Footer::LoadMore
        } else if self.search.is_exhausted() && !self.search.images().is_empty() {
            Footer::End
        } else {
            Footer::Nothing
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let mut page = column![ui::searchbar::view(&self.input)];
        if let Some(error) = self.search.error() {
            page = page.push(
                container(text(format!("Error: {error}")).color(Color::from_rgb(1.0, 0.3, 0.3)))
                    .padding([4, 16]),
            );
        } else if !self.search.images().is_empty() {
            page = page.push(
                container(
                    text(format!(
                        "{} images for \"{}\"",
                        self.search.images().len(),
                        self.search.query()
                    ))
                    .size(14),
                )
                .padding([4, 16]),
            );
        }
        page = page.push(ui::gallery::view(
            self.search.images(),
            &self.thumbnails,
            self.footer(),
        ));

        let mut layers: Vec<Element<'_, Message>> = vec![page.height(Length::Fill).into()];

        if let Some(image) = self.search.overlay().current() {
            let full_size = self
                .full_size
                .as_ref()
                .filter(|(id, _)| *id == image.id)
                .map(|(_, handle)| handle);
            layers.push(ui::overlay::view(image, full_size));
        }

        if !self.notices.is_empty() {
            layers.push(ui::notices::view(&self.notices));
        }

        stack(layers).into()
    }

    fn subscription(&self) -> Subscription<Message> {
        // Escape is only listened for while there is something to close
        let escape = if self.search.overlay().is_open() {
            keyboard::on_key_press(|key, _modifiers| match key {
                keyboard::Key::Named(key::Named::Escape) => Some(Message::CloseOverlay),
                _ => None,
            })
        } else {
            Subscription::none()
        };

        let sweep = if self.notices.is_empty() {
            Subscription::none()
        } else {
            time::every(NOTICE_SWEEP_INTERVAL).map(Message::Tick)
        };

        Subscription::batch([escape, sweep])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn to_handle(decoded: DecodedImage) -> Handle {
    Handle::from_rgba(decoded.width, decoded.height, decoded.pixels)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = config::Settings::load().unwrap_or_else(|err| {
        eprintln!("⚠️  {err}; using default settings");
        config::Settings::default().with_env_overrides(|key| std::env::var(key).ok())
    });

    if let Err(err) = logging::init(&settings.log_file_path) {
        eprintln!("⚠️  Logging disabled: {err}");
    }

    info!(
        log_file = %settings.log_file_path.display(),
        per_page = settings.per_page,
        "🎨 Pixel Finder starting"
    );
    if settings.api_key.is_empty() {
        warn!(
            "no API key configured; set {} or api_key in config.toml",
            config::API_KEY_ENV
        );
    }

    let http = service::http_client(settings.request_timeout)?;

    iced::application("Pixel Finder", PixelFinder::update, PixelFinder::view)
        .theme(PixelFinder::theme)
        .subscription(PixelFinder::subscription)
        .centered()
        .run_with(move || PixelFinder::new(&settings, http))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::page;

    fn app() -> PixelFinder {
        let (app, _) = PixelFinder::new(&config::Settings::default(), reqwest::Client::new());
        app
    }

    fn decoded() -> DecodedImage {
        DecodedImage {
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        }
    }

    /// Feed `result` back as the response to the request in flight
    fn deliver(app: &mut PixelFinder, result: Result<SearchPage, SearchError>) {
        let ticket = app
            .search
            .in_flight()
            .cloned()
            .expect("a request should be in flight");
        let _ = app.update(Message::Fetched(ticket, result));
    }

    fn search(app: &mut PixelFinder, query: &str, first: SearchPage) {
        let _ = app.update(Message::InputChanged(query.to_string()));
        let _ = app.update(Message::Submit);
        deliver(app, Ok(first));
    }

    #[test]
    fn test_scroll_ignored_while_overlay_open() {
        let mut app = app();
        search(&mut app, "fox", page(1..13, 30));

        let _ = app.update(Message::OpenImage(3));
        let _ = app.update(Message::GalleryScrolled(1.0));
        assert!(!app.search.is_loading());

        let _ = app.update(Message::CloseOverlay);
        let _ = app.update(Message::GalleryScrolled(1.0));
        assert!(app.search.is_loading());
        assert_eq!(app.search.in_flight().map(|t| t.page), Some(2));
    }

    #[test]
    fn test_revealed_page_does_not_chain_another_load() {
        let mut app = app();
        search(&mut app, "fox", page(1..13, 100));

        let _ = app.update(Message::LoadMore);
        deliver(&mut app, Ok(page(13..25, 100)));
        assert_eq!(app.search.images().len(), 24);

        // The snap to new content reports the bottom of the gallery
        let _ = app.update(Message::GalleryScrolled(1.0));
        assert!(!app.search.is_loading());

        let _ = app.update(Message::GalleryScrolled(0.5));
        let _ = app.update(Message::GalleryScrolled(1.0));
        assert!(app.search.is_loading());
    }

    #[test]
    fn test_new_search_drops_cached_thumbnails() {
        let mut app = app();
        search(&mut app, "fox", page(1..13, 30));
        assert_eq!(app.requested.len(), 12);

        let _ = app.update(Message::ThumbnailLoaded(1, Ok(decoded())));
        assert!(app.thumbnails.contains_key(&1));

        let _ = app.update(Message::InputChanged("owl".into()));
        let _ = app.update(Message::Submit);

        assert!(app.thumbnails.is_empty());
        assert!(app.requested.is_empty());
    }

    #[test]
    fn test_thumbnail_for_discarded_result_is_dropped() {
        let mut app = app();
        search(&mut app, "fox", page(1..13, 30));

        let _ = app.update(Message::ThumbnailLoaded(99, Ok(decoded())));

        assert!(!app.thumbnails.contains_key(&99));
    }

    #[test]
    fn test_full_size_for_closed_overlay_is_dropped() {
        let mut app = app();
        search(&mut app, "fox", page(1..13, 30));

        let _ = app.update(Message::OpenImage(3));
        let _ = app.update(Message::CloseOverlay);
        let _ = app.update(Message::FullSizeLoaded(3, Ok(decoded())));
        assert!(app.full_size.is_none());

        // A newer image replaced the one being downloaded
        let _ = app.update(Message::OpenImage(4));
        let _ = app.update(Message::FullSizeLoaded(3, Ok(decoded())));
        assert!(app.full_size.is_none());

        let _ = app.update(Message::FullSizeLoaded(4, Ok(decoded())));
        assert_eq!(app.full_size.as_ref().map(|(id, _)| *id), Some(4));
    }

    #[test]
    fn test_footer_marks_end_of_results() {
        let mut app = app();
        assert_eq!(app.footer(), Footer::Nothing);

        let _ = app.update(Message::InputChanged("fox".into()));
        let _ = app.update(Message::Submit);
        assert_eq!(app.footer(), Footer::Loading);

        deliver(&mut app, Ok(page(1..13, 20)));
        assert_eq!(app.footer(), Footer::LoadMore);

        let _ = app.update(Message::LoadMore);
        deliver(&mut app, Ok(page(13..21, 20)));
        assert_eq!(app.footer(), Footer::End);
    }
}
