//! Recording implementations of the collaborator traits for tests.
//!
//! The real controls move the cursor, press media keys, or shut the
//! machine down — none of which a test can tolerate or observe. One
//! [`RecordingControls`] instance implements all three traits and records
//! every call into `Mutex<Vec<…>>` fields, so a single `Arc` can be handed
//! to the dispatcher as each collaborator and inspected afterwards:
//!
//! ```ignore
//! let controls = Arc::new(RecordingControls::new());
//! let dispatcher = Dispatcher::new(
//!     Arc::clone(&controls) as Arc<dyn MediaControl>,
//!     Arc::clone(&controls) as Arc<dyn InputControl>,
//!     Arc::clone(&controls) as Arc<dyn SystemControl>,
//!     files,
//! );
//! // … route commands …
//! assert_eq!(*controls.system.lock().unwrap(), vec![SystemAction::Lock]);
//! ```

use std::sync::Mutex;

use remote_core::{Fields, InputAction, MediaAction, SystemAction};

use crate::application::dispatch::{InputControl, MediaControl, SystemControl};

/// Records every collaborator call without touching the platform.
#[derive(Debug, Default)]
pub struct RecordingControls {
    /// Each media call as (action, `value` field).
    pub media: Mutex<Vec<(MediaAction, i64)>>,
    /// Each input call as (action, deltaX, deltaY, button-or-key-or-text).
    pub input: Mutex<Vec<(InputAction, i64, i64, String)>>,
    /// Each power action received.
    pub system: Mutex<Vec<SystemAction>>,
}

impl RecordingControls {
    /// Creates a recorder with empty call logs.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MediaControl for RecordingControls {
    fn handle(&self, action: MediaAction, fields: &Fields) {
        self.media
            .lock()
            .unwrap()
            .push((action, fields.int_field("value")));
    }
}

impl InputControl for RecordingControls {
    fn handle(&self, action: InputAction, fields: &Fields) {
        // One string slot serves all of button/key/text — at most one of
        // them is meaningful per action.
        let detail = match action {
            InputAction::MouseMove => String::new(),
            InputAction::MouseClick => fields.str_field("button"),
            InputAction::Key => fields.str_field("key"),
            InputAction::Text => fields.str_field("text"),
        };
        self.input.lock().unwrap().push((
            action,
            fields.int_field("deltaX"),
            fields.int_field("deltaY"),
            detail,
        ));
    }
}

impl SystemControl for RecordingControls {
    fn handle(&self, action: SystemAction) {
        self.system.lock().unwrap().push(action);
    }
}
