use gtk4::prelude::*;
use gtk4::{gdk, glib, Button, Picture};

use crate::pipeline::{Affordance, DecodedImage, DisplaySurface, SurfaceUpdate};

/// Image view plus the two buttons the pipeline toggles.
pub(super) struct GtkSurface {
    picture: Picture,
    open_button: Button,
    add_overlay_button: Button,
}

impl GtkSurface {
    pub(super) fn new(picture: Picture, open_button: Button, add_overlay_button: Button) -> Self {
        Self {
            picture,
            open_button,
            add_overlay_button,
        }
    }

    fn button(&self, affordance: Affordance) -> &Button {
        match affordance {
            Affordance::Open => &self.open_button,
            Affordance::AddOverlay => &self.add_overlay_button,
        }
    }
}

impl DisplaySurface for GtkSurface {
    fn apply(&mut self, update: SurfaceUpdate) {
        let (image, visibility) = update.into_parts();
        if let Some(image) = image {
            self.picture.set_paintable(Some(&texture_for(image)));
        }
        for (affordance, visible) in visibility {
            self.button(affordance).set_visible(visible);
        }
    }
}

fn texture_for(image: DecodedImage) -> gdk::MemoryTexture {
    let width = i32::try_from(image.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(image.height()).unwrap_or(i32::MAX);
    let stride = image.stride();
    let bytes = glib::Bytes::from_owned(image.into_raw());
    gdk::MemoryTexture::new(width, height, gdk::MemoryFormat::R8g8b8a8, &bytes, stride)
}
