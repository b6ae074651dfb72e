//! GTK shell: window, buttons, file picker and the main-loop side of the
//! image pipeline.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use gtk4::prelude::*;
use gtk4::{graphene, Align, Application, ApplicationWindow, Button, Label, Overlay, Widget};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::overlay::{self, ElementId, OverlayDrag};
use crate::pipeline::{AcquisitionPipeline, FsResolver};

mod container;
mod picker;
mod surface;
mod worker;

use self::container::GtkLayoutContainer;
use self::picker::{show_image_picker, PickerSlot};
use self::surface::GtkSurface;

const APP_ID: &str = "io.github.picnote";
const WINDOW_TITLE: &str = "picnote";
const WINDOW_DEFAULT_WIDTH: i32 = 480;
const WINDOW_DEFAULT_HEIGHT: i32 = 800;
const FLOATING_BUTTON_MARGIN: i32 = 24;

type SharedPipeline = Rc<RefCell<AcquisitionPipeline>>;
type SharedContainer = Rc<RefCell<GtkLayoutContainer>>;
type SharedDrag = Rc<RefCell<OverlayDrag>>;

pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn start(&mut self) -> AppResult<()> {
        let application = Application::builder().application_id(APP_ID).build();
        let config = self.config.clone();
        let startup_error = Rc::new(RefCell::new(None::<AppError>));
        let startup_error_for_activate = startup_error.clone();
        let activate_once = Rc::new(Cell::new(false));

        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            if let Err(err) = build_screen(app, &config) {
                tracing::error!(?err, "failed to build annotation screen");
                startup_error_for_activate.borrow_mut().replace(err);
                app.quit();
            }
        });

        let exit_code = application.run();
        if let Some(err) = startup_error.borrow_mut().take() {
            return Err(err);
        }
        if exit_code != gtk4::glib::ExitCode::SUCCESS {
            tracing::warn!(?exit_code, "gtk application exited with failure status");
        }
        Ok(())
    }
}

fn build_screen(app: &Application, config: &AppConfig) -> AppResult<()> {
    let pipeline: SharedPipeline = Rc::new(RefCell::new(AcquisitionPipeline::new(
        Arc::new(FsResolver),
        config.scheduler_config(),
        config.gate_policy(),
    )?));
    let overlay_style = Rc::new(config.overlay_style());
    tracing::info!(
        gate_policy = ?config.gate_policy(),
        workers = config.scheduler_config().workers,
        "building annotation screen"
    );

    let window = ApplicationWindow::new(app);
    window.set_title(Some(WINDOW_TITLE));
    window.set_default_size(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT);

    let container: SharedContainer = Rc::new(RefCell::new(GtkLayoutContainer::new()));

    let open_button = Button::with_label("Open image");
    open_button.set_halign(Align::Center);
    open_button.set_valign(Align::Center);
    open_button.add_css_class("suggested-action");

    let add_overlay_button = Button::from_icon_name("list-add-symbolic");
    add_overlay_button.set_tooltip_text(Some("Add text"));
    add_overlay_button.set_halign(Align::End);
    add_overlay_button.set_valign(Align::End);
    add_overlay_button.set_margin_end(FLOATING_BUTTON_MARGIN);
    add_overlay_button.set_margin_bottom(FLOATING_BUTTON_MARGIN);
    add_overlay_button.add_css_class("circular");
    add_overlay_button.set_visible(false);

    let root = Overlay::new();
    root.set_child(Some(container.borrow().widget()));
    root.add_overlay(&open_button);
    root.add_overlay(&add_overlay_button);
    window.set_child(Some(&root));

    let surface = Rc::new(RefCell::new(GtkSurface::new(
        container.borrow().picture().clone(),
        open_button.clone(),
        add_overlay_button.clone(),
    )));

    let picker_slot: PickerSlot = Rc::new(RefCell::new(None));
    let window_for_open = window.clone();
    open_button.connect_clicked(move |_| {
        let ticket = match pipeline.borrow_mut().request_open() {
            Ok(ticket) => ticket,
            Err(err) => {
                tracing::debug!(%err, "ignoring open request");
                return;
            }
        };

        let pipeline = pipeline.clone();
        let surface = surface.clone();
        show_image_picker(&window_for_open, &picker_slot, move |selection| {
            let scheduled = pipeline.borrow_mut().on_selection_result(ticket, selection);
            match scheduled {
                Ok(Some(_)) => worker::pump_completions(pipeline, surface),
                Ok(None) => {}
                Err(err) => tracing::warn!(%err, "image load was not scheduled"),
            }
        });
    });

    let drag: SharedDrag = Rc::new(RefCell::new(OverlayDrag::new()));
    add_overlay_button.connect_clicked(move |_| {
        let element = overlay::create_overlay(&mut *container.borrow_mut(), &overlay_style);
        let label = container.borrow().label_for(element.id);
        if let Some(label) = label {
            connect_overlay_drag(&label, element.id, container.clone(), drag.clone());
        }
    });

    window.present();
    Ok(())
}

/// Maps a point in `label` coordinates into `base` coordinates.
///
/// The label moves while it is dragged, so positions must be taken against
/// the fixed base widget.
fn point_in_base(label: &Label, base: &Widget, x: f64, y: f64) -> Option<(i32, i32)> {
    let point = label.compute_point(base, &graphene::Point::new(x as f32, y as f32))?;
    Some((point.x().round() as i32, point.y().round() as i32))
}

fn connect_overlay_drag(
    label: &Label,
    element: ElementId,
    container: SharedContainer,
    drag: SharedDrag,
) {
    let gesture = gtk4::GestureDrag::new();
    gesture.set_button(gtk4::gdk::BUTTON_PRIMARY);
    let base: Widget = container.borrow().widget().clone().upcast();

    let begin_drag = drag.clone();
    let begin_label = label.clone();
    let begin_base = base.clone();
    gesture.connect_drag_begin(move |_, start_x, start_y| {
        match point_in_base(&begin_label, &begin_base, start_x, start_y) {
            Some((x, y)) => begin_drag.borrow_mut().press(element, x, y),
            None => tracing::debug!(%element, "drag start outside the base layout"),
        }
    });

    let update_drag = drag.clone();
    let update_label = label.clone();
    gesture.connect_drag_update(move |gesture, offset_x, offset_y| {
        let Some((start_x, start_y)) = gesture.start_point() else {
            return;
        };
        let Some((x, y)) =
            point_in_base(&update_label, &base, start_x + offset_x, start_y + offset_y)
        else {
            return;
        };
        let delta = update_drag.borrow_mut().move_to(x, y);
        if let Some(delta) = delta {
            overlay::reposition_overlay(&mut *container.borrow_mut(), delta);
        }
    });

    gesture.connect_drag_end(move |_, _, _| {
        drag.borrow_mut().release();
    });

    label.add_controller(gesture);
}
