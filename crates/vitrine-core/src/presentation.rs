//! Secondary-display presentation.
//!
//! Acquiring a second screen is a platform capability the core only invokes.
//! Any failure leaves the presentation in the local window with a message
//! for the user; nothing here is fatal.

use crate::articles::Article;
use crate::templates::Template;
use serde::Serialize;
use thiserror::Error;

/// Presentation errors. `Display` is the message shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PresentationError {
    #[error("This platform does not support secondary-display presentation. The presentation will be shown in this window.")]
    Unsupported,
    #[error("No secondary screens were found. The presentation will be shown in this window.")]
    NoSecondaryScreen,
    #[error("The presentation could not be started. Please try again. ({0})")]
    Failed(String),
}

/// An open channel to a secondary display.
pub trait PresentationConnection {
    /// Deliver a serialized message to the remote display.
    fn send(&mut self, message: &str) -> Result<(), PresentationError>;

    /// Whether the remote side is still attached.
    fn is_open(&self) -> bool;
}

/// Platform hook able to open a presentation on another screen.
pub trait PresentationCapability {
    fn start(&mut self) -> Result<Box<dyn PresentationConnection>, PresentationError>;
}

/// A platform with no presentation support at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPresentation;

impl PresentationCapability for NoPresentation {
    fn start(&mut self) -> Result<Box<dyn PresentationConnection>, PresentationError> {
        Err(PresentationError::Unsupported)
    }
}

/// Message pushed to the secondary display.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PresentationMessage<'a> {
    Update {
        template: &'a Template,
        articles: &'a [Article],
    },
}

/// Tracks the secondary-display connection, if any.
#[derive(Default)]
pub struct Presenter {
    connection: Option<Box<dyn PresentationConnection>>,
    error_message: Option<String>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start presenting. On failure the message is kept for display
    /// and the caller keeps rendering locally.
    pub fn start(
        &mut self,
        capability: &mut dyn PresentationCapability,
        template: Option<&Template>,
        articles: &[Article],
    ) -> Result<(), PresentationError> {
        if self.is_presenting() {
            return Ok(());
        }
        match capability.start() {
            Ok(connection) => {
                log::info!("Presentation started on secondary display");
                self.connection = Some(connection);
                self.error_message = None;
                self.publish(template, articles);
                Ok(())
            }
            Err(e) => {
                log::error!("Error starting presentation: {:?}", e);
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Push the current template and articles to the secondary display.
    /// Connections found closed are dropped.
    pub fn publish(&mut self, template: Option<&Template>, articles: &[Article]) {
        if self.connection.as_ref().is_some_and(|c| !c.is_open()) {
            log::info!("Presentation connection closed");
            self.connection = None;
        }
        let (Some(connection), Some(template)) = (self.connection.as_mut(), template) else {
            return;
        };
        let message = PresentationMessage::Update { template, articles };
        match serde_json::to_string(&message) {
            Ok(json) => {
                if let Err(e) = connection.send(&json) {
                    log::warn!("Presentation send failed: {}", e);
                }
            }
            Err(e) => log::error!("Failed to serialize presentation update: {}", e),
        }
    }

    pub fn stop(&mut self) {
        self.connection = None;
    }

    pub fn is_presenting(&self) -> bool {
        self.connection.as_ref().is_some_and(|c| c.is_open())
    }

    /// Last user-facing failure message.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::WebProperties;
    use crate::templates::TemplateStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        sent: Rc<RefCell<Vec<String>>>,
        open: Rc<RefCell<bool>>,
    }

    impl PresentationConnection for Recorder {
        fn send(&mut self, message: &str) -> Result<(), PresentationError> {
            self.sent.borrow_mut().push(message.to_string());
            Ok(())
        }

        fn is_open(&self) -> bool {
            *self.open.borrow()
        }
    }

    struct SecondScreen {
        sent: Rc<RefCell<Vec<String>>>,
        open: Rc<RefCell<bool>>,
    }

    impl PresentationCapability for SecondScreen {
        fn start(&mut self) -> Result<Box<dyn PresentationConnection>, PresentationError> {
            Ok(Box::new(Recorder {
                sent: self.sent.clone(),
                open: self.open.clone(),
            }))
        }
    }

    struct NoScreens;

    impl PresentationCapability for NoScreens {
        fn start(&mut self) -> Result<Box<dyn PresentationConnection>, PresentationError> {
            Err(PresentationError::NoSecondaryScreen)
        }
    }

    #[test]
    fn test_unsupported_degrades_with_message() {
        let mut presenter = Presenter::new();
        let result = presenter.start(&mut NoPresentation, None, &[]);
        assert_eq!(result, Err(PresentationError::Unsupported));
        assert!(!presenter.is_presenting());
        assert!(presenter.error_message().unwrap().contains("shown in this window"));

        let result = presenter.start(&mut NoScreens, None, &[]);
        assert_eq!(result, Err(PresentationError::NoSecondaryScreen));
        assert!(presenter.error_message().unwrap().starts_with("No secondary screens"));
    }

    #[test]
    fn test_start_sends_update_and_tracks_close() {
        let mut store = TemplateStore::new();
        let template = store.create("Promo", &[], &WebProperties::default()).unwrap().clone();
        let sent = Rc::new(RefCell::new(Vec::new()));
        let open = Rc::new(RefCell::new(true));
        let mut screen = SecondScreen {
            sent: sent.clone(),
            open: open.clone(),
        };

        let mut presenter = Presenter::new();
        presenter.start(&mut NoScreens, Some(&template), &[]).unwrap_err();
        presenter.start(&mut screen, Some(&template), &[]).unwrap();
        assert!(presenter.is_presenting());
        assert!(presenter.error_message().is_none());

        let first: serde_json::Value = serde_json::from_str(&sent.borrow()[0]).unwrap();
        assert_eq!(first["type"], "update");
        assert_eq!(first["template"]["name"], "Promo");

        *open.borrow_mut() = false;
        presenter.publish(Some(&template), &[]);
        assert!(!presenter.is_presenting());
        assert_eq!(sent.borrow().len(), 1);
    }
}
