//! The annotation editor session
//!
//! `Editor` owns the document, the selection, the active tool and the
//! transient pointer and text-edit sessions. Every processed message leaves
//! the drawing surface redrawn from the document.

use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::annotations::handlers::{StyleEdit, build_annotation, build_text};
use crate::annotations::hit_test::find_top_shape;
use crate::capture::image::BaseImage;
use crate::config::ToolParameters;
use crate::domain::{Annotation, Construction, Cursor, DragSession, Gesture, Point, ToolMode};
use crate::export::flatten;
use crate::render::Renderer;
use crate::session::messages::EditorMsg;
use crate::session::shortcuts::handle_key_event;
use crate::session::state::AnnotationState;
use crate::session::text_edit::{OverlayLayout, TextEditAdapter, TextEditSession, overlay_width};

pub struct Editor {
    base: BaseImage,
    surface: Pixmap,
    state: AnnotationState,
    mode: ToolMode,
    /// Last drawing tool activated, resumed by clicking empty canvas in select mode
    last_active_tool: Option<ToolMode>,
    /// Tool whose parameter tooltip is showing
    tooltip: Option<ToolMode>,
    params: ToolParameters,
    gesture: Gesture,
    text_edit: Option<TextEditSession>,
    overlay: Box<dyn TextEditAdapter>,
    renderer: Renderer,
}

impl Editor {
    pub fn new(
        base: BaseImage,
        params: ToolParameters,
        renderer: Renderer,
        overlay: Box<dyn TextEditAdapter>,
    ) -> anyhow::Result<Self> {
        let (width, height) = base.display_size();
        let surface = Pixmap::new(width, height)
            .ok_or_else(|| anyhow::anyhow!("Failed to allocate {width}x{height} drawing surface"))?;
        Ok(Self {
            base,
            surface,
            state: AnnotationState::default(),
            mode: ToolMode::Select,
            last_active_tool: None,
            tooltip: None,
            params,
            gesture: Gesture::Idle,
            text_edit: None,
            overlay,
            renderer,
        })
    }

    /// Process one input message and redraw
    pub fn update(&mut self, msg: EditorMsg) {
        match msg {
            EditorMsg::ActivateTool { mode } => self.activate_tool(mode),
            EditorMsg::PointerDown { x, y } => self.pointer_down(Point::new(x, y)),
            EditorMsg::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            EditorMsg::PointerUp { x, y } => self.pointer_up(Point::new(x, y)),
            EditorMsg::DoubleClick { x, y } => self.double_click(Point::new(x, y)),
            EditorMsg::Key { key, modifiers } => {
                if let Some(msg) = handle_key_event(&key, modifiers, self.is_text_editing()) {
                    self.update(msg);
                }
                return;
            }
            EditorMsg::TextInput { text } => self.text_input(text),
            EditorMsg::TextCommit => {
                self.finish_text_edit(true);
            }
            EditorMsg::TextCancel => {
                self.finish_text_edit(false);
            }
            EditorMsg::Undo => {
                // Pressing a toolbar button takes focus from the edit field
                self.finish_text_edit(true);
                self.state.undo();
                self.release_drag();
            }
            EditorMsg::Redo => {
                self.finish_text_edit(true);
                self.state.redo();
                self.release_drag();
            }
            EditorMsg::DeleteSelected => {
                let text_editing = self.is_text_editing();
                if self.state.delete_selected(text_editing).is_some() {
                    self.release_drag();
                }
            }
            EditorMsg::Restyle { edit } => self.restyle_selected(&edit),
        }
        self.redraw();
    }

    // ========================================================================
    // Tools
    // ========================================================================

    fn activate_tool(&mut self, mode: ToolMode) {
        self.gesture = Gesture::Idle;
        self.finish_text_edit(false);

        if mode == ToolMode::Select {
            log::debug!("Select tool activated");
            self.mode = ToolMode::Select;
            self.tooltip = None;
            self.state.select(None);
            return;
        }

        if self.tooltip == Some(mode) {
            log::debug!("Tooltip for {mode:?} toggled off");
            self.tooltip = None;
            self.mode = ToolMode::Select;
            self.state.select(None);
            return;
        }

        log::debug!("Tool {mode:?} activated");
        self.mode = mode;
        self.last_active_tool = Some(mode);
        self.tooltip = Some(mode);
        self.state.select(None);
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    fn pointer_down(&mut self, point: Point) {
        // The edit field loses focus
        self.finish_text_edit(true);

        if let Some(index) = find_top_shape(&self.state.annotations, point, self.renderer.fonts()) {
            self.mode = ToolMode::Select;
            self.tooltip = None;
            self.state.select(Some(index));
            let anchor = self.state.annotations[index].anchor();
            self.gesture = Gesture::Dragging(DragSession {
                index,
                offset: point.offset_from(anchor),
            });
            log::debug!("Grabbed annotation {index}");
            return;
        }

        self.state.select(None);
        self.gesture = Gesture::Idle;

        let mode = match (self.mode, self.last_active_tool) {
            (ToolMode::Select, Some(tool)) => {
                log::debug!("Resuming {tool:?} from empty canvas");
                self.mode = tool;
                self.tooltip = Some(tool);
                tool
            }
            (mode, _) => mode,
        };

        if mode.is_drag_construction() {
            self.gesture = Gesture::Constructing(Construction {
                start: point,
                current: point,
            });
        } else if mode == ToolMode::DrawText {
            self.create_text(point);
        }
    }

    fn pointer_move(&mut self, point: Point) {
        match &mut self.gesture {
            Gesture::Dragging(drag) => {
                // Only the selected annotation follows the pointer
                if self.state.selected() != Some(drag.index) {
                    return;
                }
                let Some(annotation) = self.state.annotations.get_mut(drag.index) else {
                    return;
                };
                match annotation {
                    Annotation::Text(t) => t.anchor = point.offset_from(drag.offset),
                    _ => {
                        let anchor = annotation.anchor();
                        let dx = point.x - (anchor.x + drag.offset.x);
                        let dy = point.y - (anchor.y + drag.offset.y);
                        annotation.translate(dx, dy);
                    }
                }
            }
            Gesture::Constructing(construction) => construction.current = point,
            Gesture::Idle => {}
        }
    }

    fn pointer_up(&mut self, point: Point) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging(drag) => log::debug!("Released annotation {}", drag.index),
            Gesture::Constructing(construction) => {
                if construction.start == point {
                    log::debug!("Discarding zero-length {:?} drag", self.mode);
                    return;
                }
                if let Some(annotation) =
                    build_annotation(self.mode, construction.start, point, &self.params)
                {
                    self.state.add(annotation);
                }
            }
            Gesture::Idle => {}
        }
    }

    fn double_click(&mut self, point: Point) {
        self.finish_text_edit(true);
        let Some(index) = find_top_shape(&self.state.annotations, point, self.renderer.fonts())
        else {
            return;
        };
        if self.state.annotations[index].as_text().is_none() {
            return;
        }
        self.gesture = Gesture::Idle;
        self.state.select(Some(index));
        self.open_text_edit(index);
    }

    // ========================================================================
    // Text editing
    // ========================================================================

    fn create_text(&mut self, anchor: Point) {
        let index = self.state.add(build_text(anchor, &self.params));
        self.state.select(Some(index));
        self.open_text_edit(index);
    }

    fn open_text_edit(&mut self, mut index: usize) {
        if let Some(removed) = self.finish_text_edit(true) {
            match removed.cmp(&index) {
                std::cmp::Ordering::Less => index -= 1,
                std::cmp::Ordering::Equal => return,
                std::cmp::Ordering::Greater => {}
            }
        }
        let Some(text) = self
            .state
            .annotations
            .get_mut(index)
            .and_then(Annotation::as_text_mut)
        else {
            return;
        };
        text.editing = true;
        let buffer = text.content.clone();
        let layout = OverlayLayout::for_text(text, &buffer, self.renderer.fonts());
        self.overlay.open(&layout, &buffer);
        log::debug!("Editing text annotation {index}");
        self.text_edit = Some(TextEditSession { index, buffer });
    }

    fn text_input(&mut self, text: String) {
        let Some(session) = self.text_edit.as_mut() else {
            return;
        };
        session.buffer = text;
        if let Some(t) = self.state.get(session.index).and_then(Annotation::as_text) {
            let width = overlay_width(&session.buffer, &t.font, t.font_size, self.renderer.fonts());
            self.overlay.resize(width);
        }
    }

    /// End the text-edit session, committing the buffer or keeping the old content
    ///
    /// A text annotation left empty is removed; its former index is returned.
    fn finish_text_edit(&mut self, commit: bool) -> Option<usize> {
        let session = self.text_edit.take()?;
        self.overlay.close();

        let text = self.state.get_mut(session.index).and_then(Annotation::as_text_mut)?;
        let trimmed = session.buffer.trim();
        if commit && !trimmed.is_empty() {
            text.content = trimmed.to_string();
        }
        text.editing = false;

        if text.content.is_empty() {
            log::debug!("Discarding empty text annotation {}", session.index);
            self.state.discard(session.index);
            self.release_drag();
            return Some(session.index);
        }
        None
    }

    /// Drop a drag whose index no longer names the grabbed annotation
    fn release_drag(&mut self) {
        if let Gesture::Dragging(drag) = self.gesture {
            log::debug!("Dropping drag of annotation {}", drag.index);
            self.gesture = Gesture::Idle;
        }
    }

    fn restyle_selected(&mut self, edit: &StyleEdit) {
        if let Some(annotation) = self.state.selected_annotation_mut()
            && edit.apply(annotation)
        {
            log::debug!("Restyled selected {}", annotation.kind());
        }
    }

    // ========================================================================
    // Rendering and export
    // ========================================================================

    /// Candidate annotation of the construction in progress
    pub fn preview(&self) -> Option<Annotation> {
        match self.gesture {
            Gesture::Constructing(c) => {
                build_annotation(self.mode, c.start, c.current, &self.params)
            }
            _ => None,
        }
    }

    fn redraw(&mut self) {
        let preview = self.preview();
        self.renderer.redraw_all(
            &mut self.surface,
            &self.state.annotations,
            self.state.selected(),
            preview.as_ref(),
            &self.base,
        );
    }

    /// Flatten the document over the base image at natural resolution
    ///
    /// Commits any open text edit first. The export pass has no selection
    /// halo and no live preview.
    pub fn export(&mut self) -> anyhow::Result<RgbaImage> {
        self.finish_text_edit(true);
        self.redraw();

        let (width, height) = self.base.display_size();
        let mut clean = Pixmap::new(width, height)
            .ok_or_else(|| anyhow::anyhow!("Failed to allocate {width}x{height} export surface"))?;
        self.renderer
            .redraw_all(&mut clean, &self.state.annotations, None, None, &self.base);
        flatten(&self.base, &clean)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn annotations(&self) -> &[Annotation] {
        &self.state.annotations
    }

    pub fn state(&self) -> &AnnotationState {
        &self.state
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn cursor(&self) -> Cursor {
        self.mode.cursor()
    }

    pub fn tooltip(&self) -> Option<ToolMode> {
        self.tooltip
    }

    pub fn last_active_tool(&self) -> Option<ToolMode> {
        self.last_active_tool
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn text_edit(&self) -> Option<&TextEditSession> {
        self.text_edit.as_ref()
    }

    pub fn is_text_editing(&self) -> bool {
        self.text_edit.is_some()
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn surface(&self) -> &Pixmap {
        &self.surface
    }

    pub fn params(&self) -> &ToolParameters {
        &self.params
    }

    /// Replace the tool parameters used for annotations drawn from now on
    pub fn set_params(&mut self, params: ToolParameters) {
        self.params = params;
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::config::{LineTool, ShapeColor};
    use crate::render::image::{matches_color, pixel_rgba};
    use crate::render::text::FontBook;
    use crate::session::messages::{Key, Modifiers, Named};
    use crate::session::text_edit::HeadlessOverlay;

    fn editor(w: u32, h: u32) -> Editor {
        let base = BaseImage::new(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])));
        Editor::new(
            base,
            ToolParameters::default(),
            Renderer::new(FontBook::empty()),
            Box::new(HeadlessOverlay::default()),
        )
        .unwrap()
    }

    fn drag(editor: &mut Editor, from: (f32, f32), to: (f32, f32)) {
        editor.update(EditorMsg::down(from.0, from.1));
        editor.update(EditorMsg::drag_to(to.0, to.1));
        editor.update(EditorMsg::up(to.0, to.1));
    }

    fn type_text(editor: &mut Editor, at: (f32, f32), text: &str) {
        editor.update(EditorMsg::tool(ToolMode::DrawText));
        editor.update(EditorMsg::down(at.0, at.1));
        editor.update(EditorMsg::up(at.0, at.1));
        editor.update(EditorMsg::input(text));
        editor.update(EditorMsg::named_key(Named::Enter));
    }

    #[test]
    fn test_draw_line_commits_on_release() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawLine));
        assert_eq!(editor.cursor(), Cursor::Crosshair);
        assert_eq!(editor.tooltip(), Some(ToolMode::DrawLine));

        editor.update(EditorMsg::down(10.0, 10.0));
        editor.update(EditorMsg::drag_to(50.0, 50.0));
        assert!(editor.annotations().is_empty());
        assert_eq!(editor.preview().map(|a| a.kind()), Some("arrow"));

        editor.update(EditorMsg::up(100.0, 10.0));
        assert_eq!(editor.annotations().len(), 1);
        assert_eq!(
            editor.annotations()[0].points(),
            Some((Point::new(10.0, 10.0), Point::new(100.0, 10.0)))
        );
        assert_eq!(editor.selected(), None);
        assert!(editor.preview().is_none());
    }

    #[test]
    fn test_zero_length_drag_is_discarded() {
        let mut editor = editor(100, 100);
        editor.update(EditorMsg::tool(ToolMode::DrawLine));
        drag(&mut editor, (20.0, 20.0), (20.0, 20.0));
        assert!(editor.annotations().is_empty());
        assert!(!editor.state().can_redo());
    }

    #[test]
    fn test_new_shapes_snapshot_parameters() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawLine));
        drag(&mut editor, (10.0, 10.0), (60.0, 10.0));

        let mut params = editor.params().clone();
        params.line_tool = LineTool::Line;
        params.line_color = ShapeColor::BLACK;
        editor.set_params(params);
        drag(&mut editor, (10.0, 100.0), (60.0, 100.0));

        assert_eq!(editor.annotations()[0].kind(), "arrow");
        match &editor.annotations()[1] {
            Annotation::Line(s) => assert_eq!(s.color, ShapeColor::BLACK),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_clicking_shape_selects_and_drags() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));

        // Grab the rectangle 5px inside its corner and move it by (20, 30)
        editor.update(EditorMsg::down(15.0, 15.0));
        assert_eq!(editor.mode(), ToolMode::Select);
        assert_eq!(editor.tooltip(), None);
        assert_eq!(editor.selected(), Some(0));
        editor.update(EditorMsg::drag_to(25.0, 30.0));
        editor.update(EditorMsg::drag_to(35.0, 45.0));
        editor.update(EditorMsg::up(35.0, 45.0));

        assert_eq!(
            editor.annotations()[0].points(),
            Some((Point::new(30.0, 40.0), Point::new(70.0, 80.0)))
        );
        assert_eq!(editor.annotations().len(), 1);
    }

    #[test]
    fn test_empty_click_resumes_last_tool() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        // Selecting the shape forces select mode
        editor.update(EditorMsg::down(30.0, 30.0));
        editor.update(EditorMsg::up(30.0, 30.0));
        assert_eq!(editor.mode(), ToolMode::Select);

        drag(&mut editor, (100.0, 100.0), (150.0, 150.0));
        assert_eq!(editor.mode(), ToolMode::DrawShape);
        assert_eq!(editor.tooltip(), Some(ToolMode::DrawShape));
        assert_eq!(editor.annotations().len(), 2);
    }

    #[test]
    fn test_empty_click_without_last_tool_only_clears_selection() {
        let mut editor = editor(100, 100);
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        assert!(editor.annotations().is_empty());
        assert_eq!(editor.mode(), ToolMode::Select);
        assert_eq!(editor.cursor(), Cursor::Pointer);
    }

    #[test]
    fn test_activating_open_tool_toggles_to_select() {
        let mut editor = editor(100, 100);
        editor.update(EditorMsg::tool(ToolMode::DrawBlur));
        editor.update(EditorMsg::tool(ToolMode::DrawBlur));
        assert_eq!(editor.mode(), ToolMode::Select);
        assert_eq!(editor.tooltip(), None);
        assert_eq!(editor.last_active_tool(), Some(ToolMode::DrawBlur));
    }

    #[test]
    fn test_tool_switch_clears_selection_and_preview() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawHighlight));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        editor.update(EditorMsg::down(30.0, 30.0));
        editor.update(EditorMsg::up(30.0, 30.0));
        assert_eq!(editor.selected(), Some(0));

        editor.update(EditorMsg::tool(ToolMode::DrawLine));
        assert_eq!(editor.selected(), None);
        editor.update(EditorMsg::down(100.0, 100.0));
        editor.update(EditorMsg::drag_to(150.0, 150.0));
        editor.update(EditorMsg::tool(ToolMode::Select));
        assert!(editor.preview().is_none());
        editor.update(EditorMsg::up(150.0, 150.0));
        assert_eq!(editor.annotations().len(), 1);
    }

    #[test]
    fn test_type_hello_and_enter() {
        let mut editor = editor(300, 200);
        type_text(&mut editor, (40.0, 40.0), "Hello");

        let text = editor.annotations()[0].as_text().unwrap();
        assert_eq!(text.content, "Hello");
        assert!(!text.editing);
        assert!(!editor.overlay_open());
        assert!(!editor.is_text_editing());
        assert_eq!(editor.selected(), Some(0));
    }

    #[test]
    fn test_new_text_opens_overlay_and_is_selected() {
        let mut editor = editor(300, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawText));
        assert_eq!(editor.cursor(), Cursor::Text);
        editor.update(EditorMsg::down(40.0, 40.0));

        assert!(editor.overlay_open());
        assert_eq!(editor.selected(), Some(0));
        assert_eq!(editor.text_edit().map(|s| s.index), Some(0));
        assert!(editor.annotations()[0].as_text().unwrap().editing);
    }

    #[test]
    fn test_commit_trims_and_keeps_previous_on_blank() {
        let mut editor = editor(300, 200);
        type_text(&mut editor, (40.0, 40.0), "  padded  ");
        assert_eq!(editor.annotations()[0].as_text().unwrap().content, "padded");

        editor.update(EditorMsg::DoubleClick { x: 45.0, y: 45.0 });
        assert!(editor.is_text_editing());
        editor.update(EditorMsg::input("   "));
        editor.update(EditorMsg::TextCommit);
        assert_eq!(editor.annotations()[0].as_text().unwrap().content, "padded");
    }

    #[test]
    fn test_escape_keeps_previous_content() {
        let mut editor = editor(300, 200);
        type_text(&mut editor, (40.0, 40.0), "first");
        editor.update(EditorMsg::DoubleClick { x: 45.0, y: 45.0 });
        editor.update(EditorMsg::input("second"));
        editor.update(EditorMsg::named_key(Named::Escape));

        assert_eq!(editor.annotations()[0].as_text().unwrap().content, "first");
        assert!(!editor.overlay_open());
    }

    #[test]
    fn test_empty_text_is_discarded_when_edit_ends() {
        let mut editor = editor(300, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawText));
        editor.update(EditorMsg::down(40.0, 40.0));
        assert_eq!(editor.annotations().len(), 1);

        // Clicking elsewhere ends the edit and starts a new text
        editor.update(EditorMsg::down(200.0, 150.0));
        assert_eq!(editor.annotations().len(), 1);
        assert_eq!(editor.text_edit().map(|s| s.index), Some(0));
        assert_eq!(editor.annotations()[0].as_text().unwrap().anchor, Point::new(200.0, 150.0));
    }

    #[test]
    fn test_delete_during_text_edit_is_noop() {
        let mut editor = editor(300, 200);
        type_text(&mut editor, (40.0, 40.0), "keep");
        editor.update(EditorMsg::DoubleClick { x: 45.0, y: 45.0 });
        assert_eq!(editor.selected(), Some(0));

        editor.update(EditorMsg::named_key(Named::Delete));
        editor.update(EditorMsg::DeleteSelected);
        assert_eq!(editor.annotations().len(), 1);
        assert!(editor.is_text_editing());
    }

    #[test]
    fn test_delete_key_removes_selection() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        drag(&mut editor, (100.0, 100.0), (150.0, 150.0));
        editor.update(EditorMsg::down(120.0, 120.0));
        editor.update(EditorMsg::up(120.0, 120.0));

        editor.update(EditorMsg::named_key(Named::Backspace));
        assert_eq!(editor.annotations().len(), 1);
        assert_eq!(editor.selected(), None);
        assert!(!editor.state().can_redo());
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawLine));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        drag(&mut editor, (10.0, 100.0), (50.0, 150.0));

        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        editor.update(EditorMsg::shortcut("z", ctrl));
        assert_eq!(editor.annotations().len(), 1);
        editor.update(EditorMsg::shortcut("y", ctrl));
        assert_eq!(editor.annotations().len(), 2);
        editor.update(EditorMsg::Key {
            key: Key::Character("z".to_string()),
            modifiers: Modifiers {
                shift: true,
                ..ctrl
            },
        });
        assert_eq!(editor.annotations().len(), 2);
    }

    #[test]
    fn test_delete_during_drag_leaves_other_shapes_in_place() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        drag(&mut editor, (100.0, 100.0), (150.0, 150.0));

        // Grab the first rectangle and delete it before releasing
        editor.update(EditorMsg::down(15.0, 15.0));
        editor.update(EditorMsg::named_key(Named::Delete));
        editor.update(EditorMsg::drag_to(60.0, 60.0));
        editor.update(EditorMsg::up(60.0, 60.0));

        assert_eq!(editor.annotations().len(), 1);
        assert_eq!(
            editor.annotations()[0].points(),
            Some((Point::new(100.0, 100.0), Point::new(150.0, 150.0)))
        );
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_undo_during_drag_stops_moving() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        drag(&mut editor, (100.0, 100.0), (150.0, 150.0));

        editor.update(EditorMsg::down(15.0, 15.0));
        editor.update(EditorMsg::Undo);
        editor.update(EditorMsg::Redo);
        editor.update(EditorMsg::drag_to(60.0, 60.0));

        assert_eq!(
            editor.annotations()[0].points(),
            Some((Point::new(10.0, 10.0), Point::new(50.0, 50.0)))
        );
        assert_eq!(
            editor.annotations()[1].points(),
            Some((Point::new(100.0, 100.0), Point::new(150.0, 150.0)))
        );
    }

    #[test]
    fn test_undo_shortcut_during_text_edit_commits_then_undoes() {
        let mut editor = editor(300, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawLine));
        drag(&mut editor, (10.0, 10.0), (50.0, 10.0));
        editor.update(EditorMsg::tool(ToolMode::DrawText));
        editor.update(EditorMsg::down(40.0, 100.0));
        editor.update(EditorMsg::input("Hi"));

        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        editor.update(EditorMsg::shortcut("z", ctrl));
        assert!(!editor.is_text_editing());
        assert_eq!(editor.annotations().len(), 1);
        assert_eq!(editor.annotations()[0].kind(), "arrow");

        editor.update(EditorMsg::shortcut("y", ctrl));
        assert_eq!(editor.annotations()[1].as_text().unwrap().content, "Hi");
    }

    #[test]
    fn test_dragging_text_moves_anchor() {
        let mut editor = editor(300, 200);
        type_text(&mut editor, (40.0, 40.0), "move me");

        editor.update(EditorMsg::down(45.0, 48.0));
        assert_eq!(editor.selected(), Some(0));
        editor.update(EditorMsg::drag_to(60.0, 70.0));
        editor.update(EditorMsg::drag_to(145.0, 108.0));
        editor.update(EditorMsg::up(145.0, 108.0));

        let text = editor.annotations()[0].as_text().unwrap();
        assert_eq!(text.anchor, Point::new(140.0, 100.0));
        assert_eq!(text.content, "move me");
    }

    #[test]
    fn test_double_click_on_shape_is_ignored() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));

        editor.update(EditorMsg::DoubleClick { x: 10.0, y: 30.0 });
        assert!(!editor.is_text_editing());
        assert!(!editor.overlay_open());
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.annotations().len(), 1);
    }

    #[test]
    fn test_toggling_text_tool_clears_new_text_selection() {
        let mut editor = editor(300, 200);
        type_text(&mut editor, (40.0, 40.0), "note");
        assert_eq!(editor.selected(), Some(0));

        editor.update(EditorMsg::tool(ToolMode::DrawText));
        assert_eq!(editor.mode(), ToolMode::Select);
        assert_eq!(editor.tooltip(), None);
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_restyle_selected_is_not_undoable() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
        editor.update(EditorMsg::down(30.0, 30.0));
        editor.update(EditorMsg::up(30.0, 30.0));

        editor.update(EditorMsg::Restyle {
            edit: StyleEdit {
                stroke_width: Some(9.0),
                ..Default::default()
            },
        });
        assert_eq!(editor.annotations()[0].stroke_width(), Some(9.0));
        editor.update(EditorMsg::Undo);
        assert!(editor.annotations().is_empty());
        editor.update(EditorMsg::Redo);
        assert_eq!(editor.annotations()[0].stroke_width(), Some(9.0));
    }

    #[test]
    fn test_surface_shows_selection_halo() {
        let mut editor = editor(200, 200);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (50.0, 50.0), (150.0, 150.0));
        // Outside the stroke, inside the halo's red rim
        assert_eq!(pixel_rgba(editor.surface(), 50, 45).unwrap()[3], 0);

        editor.update(EditorMsg::down(50.0, 100.0));
        editor.update(EditorMsg::up(50.0, 100.0));
        let rim = pixel_rgba(editor.surface(), 100, 45).unwrap();
        assert!(rim[3] > 0);
    }

    #[test]
    fn test_export_flattens_without_halo() {
        let mut editor = editor(200, 100);
        editor.update(EditorMsg::tool(ToolMode::DrawShape));
        drag(&mut editor, (20.0, 20.0), (120.0, 80.0));
        editor.update(EditorMsg::down(20.0, 50.0));
        editor.update(EditorMsg::up(20.0, 50.0));
        assert_eq!(editor.selected(), Some(0));

        let out = editor.export().unwrap();
        assert_eq!(out.dimensions(), (200, 100));
        assert_eq!(out.get_pixel(5, 5).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(70, 50).0, [255, 255, 255, 255]);
        let stroke = out.get_pixel(20, 50).0;
        assert!(matches_color(stroke, ShapeColor::RED, 10));
        // The halo would have painted here
        assert_eq!(out.get_pixel(70, 14).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_export_commits_open_text_edit() {
        let mut editor = editor(200, 100);
        editor.update(EditorMsg::tool(ToolMode::DrawText));
        editor.update(EditorMsg::down(10.0, 10.0));
        editor.update(EditorMsg::input("note"));

        editor.export().unwrap();
        assert!(!editor.is_text_editing());
        assert_eq!(editor.annotations()[0].as_text().unwrap().content, "note");
    }
}
