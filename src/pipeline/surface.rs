use super::decode::DecodedImage;

/// Buttons whose visibility the pipeline controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    Open,
    AddOverlay,
}

/// A batch of surface mutations applied in one UI turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceUpdate {
    image: Option<DecodedImage>,
    visibility: Vec<(Affordance, bool)>,
}

impl SurfaceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raster assignment plus the affordance flip that follows a load.
    pub fn reveal(image: DecodedImage) -> Self {
        Self::new()
            .set_image(image)
            .set_visible(Affordance::Open, false)
            .set_visible(Affordance::AddOverlay, true)
    }

    pub fn set_image(mut self, image: DecodedImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn set_visible(mut self, affordance: Affordance, visible: bool) -> Self {
        self.visibility.push((affordance, visible));
        self
    }

    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    pub fn visibility(&self) -> &[(Affordance, bool)] {
        &self.visibility
    }

    pub fn into_parts(self) -> (Option<DecodedImage>, Vec<(Affordance, bool)>) {
        (self.image, self.visibility)
    }
}

/// Presentation target for decoded rasters.
pub trait DisplaySurface {
    /// Applies every mutation in `update` before returning control to the
    /// event loop.
    fn apply(&mut self, update: SurfaceUpdate);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub image: Option<DecodedImage>,
    pub open_visible: bool,
    pub add_overlay_visible: bool,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            image: None,
            open_visible: true,
            add_overlay_visible: false,
        }
    }
}

impl SurfaceState {
    fn apply(&mut self, update: SurfaceUpdate) {
        let (image, visibility) = update.into_parts();
        if let Some(image) = image {
            self.image = Some(image);
        }
        for (affordance, visible) in visibility {
            match affordance {
                Affordance::Open => self.open_visible = visible,
                Affordance::AddOverlay => self.add_overlay_visible = visible,
            }
        }
    }
}

/// In-memory surface that keeps every observable state it passed through.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: SurfaceState,
    history: Vec<SurfaceState>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    /// States observed after each applied update, oldest first.
    pub fn history(&self) -> &[SurfaceState] {
        &self.history
    }
}

impl DisplaySurface for RecordingSurface {
    fn apply(&mut self, update: SurfaceUpdate) {
        self.state.apply(update);
        self.history.push(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn raster() -> DecodedImage {
        DecodedImage::from_rgba(RgbaImage::new(3, 2))
    }

    #[test]
    fn reveal_sets_image_and_flips_both_affordances() {
        let update = SurfaceUpdate::reveal(raster());
        assert_eq!(update.image().map(DecodedImage::width), Some(3));
        assert_eq!(
            update.visibility(),
            &[(Affordance::Open, false), (Affordance::AddOverlay, true)]
        );
    }

    #[test]
    fn recording_surface_snapshots_once_per_update() {
        let mut surface = RecordingSurface::new();
        assert!(surface.state().open_visible);
        assert!(!surface.state().add_overlay_visible);

        surface.apply(SurfaceUpdate::reveal(raster()));

        assert_eq!(surface.history().len(), 1);
        let state = surface.state();
        assert!(state.image.is_some());
        assert!(!state.open_visible);
        assert!(state.add_overlay_visible);
    }

    #[test]
    fn visibility_only_update_keeps_existing_image() {
        let mut surface = RecordingSurface::new();
        surface.apply(SurfaceUpdate::reveal(raster()));
        surface.apply(SurfaceUpdate::new().set_visible(Affordance::AddOverlay, false));

        assert!(surface.state().image.is_some());
        assert!(!surface.state().add_overlay_visible);
    }
}
