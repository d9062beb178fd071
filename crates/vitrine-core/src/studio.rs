//! Top-level editor and advertising-display state.
//!
//! `Studio` is the single owner of everything the front end edits: the live
//! component list, page properties, saved templates, the article mirror and
//! the display rotation. It starts empty and nothing is persisted; callers
//! hold it explicitly and pass it to whatever needs it.

use crate::articles::{Article, ArticleMirror, RelayEvent};
use crate::color::HexColor;
use crate::components::{Component, ComponentId, ComponentKind};
use crate::display::{AdvertisingDisplay, DisplayError};
use crate::drag::{DragController, DragTarget, DragUpdate, EditorTab};
use crate::geometry::PercentPoint;
use crate::input::{MouseButton, PointerEvent};
use crate::presentation::{PresentationCapability, PresentationError, Presenter};
use crate::properties::WebProperties;
use crate::relay::ClientEvent;
use crate::selection::Selection;
use crate::shapes::{BackgroundShape, ShapeId, ShapeKind};
use crate::templates::{Template, TemplateError, TemplateId, TemplateStore};
use kurbo::{Point, Rect};
use std::time::Duration;
use thiserror::Error;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Editor,
    Advertising,
}

/// Studio errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StudioError {
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),
    #[error("Background shape not found: {0}")]
    ShapeNotFound(ShapeId),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Owner of all editor and display state.
#[derive(Default)]
pub struct Studio {
    view: View,
    active_tab: EditorTab,
    components: Vec<Component>,
    web_properties: WebProperties,
    selection: Selection,
    drag: DragController,
    templates: TemplateStore,
    articles: ArticleMirror,
    display: AdvertisingDisplay,
    presenter: Presenter,
    /// Last non-blocking message for the user (failed requests etc.).
    notice: Option<String>,
}

impl Studio {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Views and tabs ---

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.drag.release();
        self.view = view;
    }

    pub fn active_tab(&self) -> EditorTab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: EditorTab) {
        self.drag.release();
        self.active_tab = tab;
    }

    // --- Accessors ---

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn web_properties(&self) -> &WebProperties {
        &self.web_properties
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn articles(&self) -> &[Article] {
        self.articles.articles()
    }

    pub fn display(&self) -> &AdvertisingDisplay {
        &self.display
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // --- Components ---

    /// Append a new component of `kind` with default content and select it.
    pub fn add_component(&mut self, kind: ComponentKind) -> ComponentId {
        let component = Component::new(kind);
        let id = component.id;
        self.components.push(component);
        self.selection = Selection::Component(id);
        log::debug!("Added {} component {}", kind.name(), id);
        id
    }

    /// Edit a component in place. Position and size are re-clamped and the
    /// component becomes the selection.
    pub fn update_component(
        &mut self,
        id: ComponentId,
        edit: impl FnOnce(&mut Component),
    ) -> Result<(), StudioError> {
        let component = self
            .components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StudioError::ComponentNotFound(id))?;
        edit(component);
        component.id = id;
        component.normalize();
        self.selection = Selection::Component(id);
        Ok(())
    }

    pub fn remove_component(&mut self, id: ComponentId) -> Result<Component, StudioError> {
        let index = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or(StudioError::ComponentNotFound(id))?;
        if self.selection.is_component(id) {
            self.selection = Selection::None;
        }
        if self.drag.target() == Some(DragTarget::Component(id)) {
            self.drag.release();
        }
        Ok(self.components.remove(index))
    }

    // --- Page properties and background shapes ---

    pub fn set_background_color(&mut self, color: HexColor) {
        self.web_properties.background_color = color;
    }

    pub fn set_text_color(&mut self, color: HexColor) {
        self.web_properties.text_color = color;
    }

    /// Append a new background shape with default style.
    pub fn add_shape(&mut self, kind: ShapeKind) -> ShapeId {
        let shape = BackgroundShape::new(kind);
        let id = shape.id;
        self.web_properties.add_shape(shape);
        log::debug!("Added {} shape {}", kind.name(), id);
        id
    }

    /// Edit a background shape; size and opacity are re-clamped.
    pub fn update_shape(&mut self, id: ShapeId, edit: impl FnOnce(&mut BackgroundShape)) -> Result<(), StudioError> {
        if self.web_properties.update_shape(id, edit) {
            Ok(())
        } else {
            Err(StudioError::ShapeNotFound(id))
        }
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Result<BackgroundShape, StudioError> {
        let removed = self
            .web_properties
            .remove_shape(id)
            .ok_or(StudioError::ShapeNotFound(id))?;
        if self.selection.is_shape(id) {
            self.selection = Selection::None;
        }
        if self.drag.target() == Some(DragTarget::Shape(id)) {
            self.drag.release();
        }
        Ok(removed)
    }

    // --- Selection ---

    pub fn select_component(&mut self, id: ComponentId) -> Result<(), StudioError> {
        if self.component(id).is_none() {
            return Err(StudioError::ComponentNotFound(id));
        }
        self.selection = Selection::Component(id);
        Ok(())
    }

    pub fn select_shape(&mut self, id: ShapeId) -> Result<(), StudioError> {
        if self.web_properties.shape(id).is_none() {
            return Err(StudioError::ShapeNotFound(id));
        }
        self.selection = Selection::Shape(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    // --- Pointer interaction ---

    /// Topmost item under `point`. Components draw above shapes, and later
    /// items above earlier ones.
    pub fn item_at(&self, point: Point, container: Rect) -> Option<DragTarget> {
        self.components
            .iter()
            .rev()
            .find(|c| c.hit_test(point, container))
            .map(|c| DragTarget::Component(c.id))
            .or_else(|| {
                self.web_properties
                    .background_shapes
                    .iter()
                    .rev()
                    .find(|s| s.hit_test(point, container))
                    .map(|s| DragTarget::Shape(s.id))
            })
    }

    /// Route a pointer event from the canvas.
    ///
    /// `container` is the canvas's pixel bounds at the time of the event.
    /// Returns true if any state changed.
    pub fn handle_pointer(&mut self, event: PointerEvent, container: Rect) -> bool {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                let Some(target) = self.item_at(position, container) else {
                    return false;
                };
                // Selecting happens on press, so a click without movement
                // still selects even when the tab forbids dragging.
                self.selection = target.selection();
                if let Some(item_position) = self.position_of(target) {
                    self.drag
                        .grab(target, item_position, position, container, self.active_tab);
                }
                true
            }
            PointerEvent::Down { .. } => false,
            PointerEvent::Move { position } => match self.drag.drag_to(position, container) {
                Some(update) => self.apply_drag_update(update),
                None => false,
            },
            PointerEvent::Up { .. } | PointerEvent::Leave => self.drag.release().is_some(),
        }
    }

    fn position_of(&self, target: DragTarget) -> Option<PercentPoint> {
        match target {
            DragTarget::Component(id) => self.component(id).map(|c| c.position),
            DragTarget::Shape(id) => self.web_properties.shape(id).map(|s| s.position),
        }
    }

    fn apply_drag_update(&mut self, update: DragUpdate) -> bool {
        let applied = match update.target {
            DragTarget::Component(id) => match self.components.iter_mut().find(|c| c.id == id) {
                Some(component) => {
                    component.position = update.position;
                    component.normalize();
                    true
                }
                None => false,
            },
            DragTarget::Shape(id) => self
                .web_properties
                .update_shape(id, |s| s.position = update.position),
        };
        if !applied {
            log::warn!("Dragged item {:?} no longer exists", update.target);
            self.drag.release();
        }
        applied
    }

    // --- Templates ---

    /// Save the live canvas as a new template.
    pub fn save_template(&mut self, name: &str) -> Result<TemplateId, StudioError> {
        let template = self.templates.create(name, &self.components, &self.web_properties)?;
        Ok(template.id().to_string())
    }

    /// Replace the live canvas with a copy of the template and clear the
    /// selection.
    pub fn apply_template(&mut self, id: &str) -> Result<(), StudioError> {
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        let (components, web_properties) = TemplateStore::apply(template);
        self.components = components;
        self.web_properties = web_properties;
        self.selection = Selection::None;
        self.drag.release();
        Ok(())
    }

    pub fn delete_template(&mut self, id: &str) -> bool {
        let showing = self.display.current_template_id().map(str::to_string);
        let removed = self.templates.delete(id).is_some();
        if removed {
            self.display.prune(&self.templates);
            if self.display.current_template_id() != showing.as_deref() {
                self.publish_presentation();
            }
        }
        removed
    }

    // --- Articles ---

    pub fn apply_relay_event(&mut self, event: RelayEvent) {
        self.articles.apply(event);
        self.publish_presentation();
    }

    /// Fold an event from the relay client into the studio.
    pub fn handle_client_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Relay(event) => self.apply_relay_event(event),
            ClientEvent::RequestFailed { message } | ClientEvent::Error { message } => {
                self.notice = Some(message);
            }
            ClientEvent::Connected
            | ClientEvent::Disconnected
            | ClientEvent::Submitted(_)
            | ClientEvent::ClearRequested => {}
        }
    }

    // --- Advertising display ---

    pub fn toggle_display_template(&mut self, id: &str) -> Result<(), StudioError> {
        if !self.templates.contains(id) {
            return Err(TemplateError::NotFound(id.to_string()).into());
        }
        self.display.toggle_template(id);
        self.publish_presentation();
        Ok(())
    }

    pub fn set_display_interval(&mut self, secs: u64) -> Result<(), StudioError> {
        Ok(self.display.set_interval_secs(secs)?)
    }

    pub fn enter_fullscreen(&mut self) -> Result<(), StudioError> {
        Ok(self.display.enter_fullscreen()?)
    }

    pub fn exit_fullscreen(&mut self) {
        self.display.exit_fullscreen();
    }

    /// Template currently showing on the advertising display.
    pub fn current_display_template(&self) -> Option<&Template> {
        self.display.current_template(&self.templates)
    }

    /// Advance the display rotation by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let advanced = self.display.tick(elapsed);
        if advanced {
            self.publish_presentation();
        }
        advanced
    }

    /// Try to move the presentation to a secondary display. On failure the
    /// presentation stays local and the message becomes the notice.
    pub fn start_presentation(&mut self, capability: &mut dyn PresentationCapability) -> Result<(), PresentationError> {
        let template = self.display.current_template(&self.templates);
        let result = self.presenter.start(capability, template, self.articles.articles());
        if let Err(ref e) = result {
            self.notice = Some(e.to_string());
        }
        result
    }

    pub fn stop_presentation(&mut self) {
        self.presenter.stop();
    }

    fn publish_presentation(&mut self) {
        let template = self.display.current_template(&self.templates);
        self.presenter.publish(template, self.articles.articles());
    }
}
