use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{ApplicationWindow, FileChooserAction, FileChooserNative, FileFilter, ResponseType};

use crate::pipeline::ImageLocator;

const IMAGE_MIME_TYPE: &str = "image/*";

/// Keeps the native dialog alive while it is on screen.
pub(super) type PickerSlot = Rc<RefCell<Option<FileChooserNative>>>;

/// Shows the system file chooser and reports the selection once.
pub(super) fn show_image_picker<F>(parent: &ApplicationWindow, slot: &PickerSlot, on_result: F)
where
    F: FnOnce(Option<ImageLocator>) + 'static,
{
    let chooser = FileChooserNative::new(
        Some("Open image"),
        Some(parent),
        FileChooserAction::Open,
        Some("_Open"),
        Some("_Cancel"),
    );
    chooser.set_modal(true);
    let filter = FileFilter::new();
    filter.set_name(Some("Images"));
    filter.add_mime_type(IMAGE_MIME_TYPE);
    chooser.add_filter(&filter);

    let on_result = RefCell::new(Some(on_result));
    let slot_for_response = slot.clone();
    chooser.connect_response(move |chooser, response| {
        let selection = if response == ResponseType::Accept {
            chooser
                .file()
                .and_then(|file| file.path())
                .map(ImageLocator::from_path)
        } else {
            None
        };
        tracing::debug!(?response, picked = selection.is_some(), "image picker closed");

        let callback = on_result.borrow_mut().take();
        if let Some(callback) = callback {
            callback(selection);
        }
        chooser.destroy();
        slot_for_response.borrow_mut().take();
    });

    chooser.show();
    slot.borrow_mut().replace(chooser);
}
