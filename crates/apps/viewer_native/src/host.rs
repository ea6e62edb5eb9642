use gpu::SceneRenderer;
use layers::{CustomLayer, FrameArgs, LayerError, LayerStack, MapHandle};
use runtime::{EventBus, FrameClock, MapEvent, RepaintScheduler};
use tracing::{debug, info};

use crate::config::{MapOptions, Viewport};
use crate::map_camera::MapCamera;

/// Offscreen stand-in for an interactive map: fixed camera, fixed frame rate,
/// repaints only when something asks for one.
#[derive(Debug)]
pub struct HeadlessMap {
    camera: MapCamera,
    loaded: bool,
    repaint: RepaintScheduler,
    events: EventBus<MapEvent>,
    clock: FrameClock,
}

impl MapHandle for HeadlessMap {
    fn request_repaint(&mut self) {
        self.repaint.request();
    }
}

impl HeadlessMap {
    pub fn new(options: &MapOptions, viewport: Viewport) -> Self {
        Self {
            camera: MapCamera {
                center_lng: options.center[0],
                center_lat: options.center[1],
                zoom: options.zoom,
                pitch_deg: options.pitch_deg,
                bearing_deg: options.bearing_deg,
                width: viewport.width,
                height: viewport.height,
            },
            loaded: false,
            repaint: RepaintScheduler::new(),
            events: EventBus::new(),
            clock: FrameClock::default(),
        }
    }

    pub fn camera(&self) -> &MapCamera {
        &self.camera
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn repaints_requested(&self) -> u64 {
        self.repaint.requested()
    }

    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain()
    }

    pub fn add_layer<R: SceneRenderer>(
        &mut self,
        stack: &mut LayerStack<R>,
        ctx: &R::Context,
        layer: Box<dyn CustomLayer<R>>,
    ) -> Result<(), LayerError> {
        let id = layer.id().to_string();
        stack.add_layer(self, ctx, layer)?;
        self.events.emit(MapEvent::LayerAdded(id));
        self.repaint.request();
        Ok(())
    }

    pub fn remove_layer<R: SceneRenderer>(
        &mut self,
        stack: &mut LayerStack<R>,
        id: &str,
    ) -> Result<(), LayerError> {
        stack.remove_layer(id)?;
        self.events.emit(MapEvent::LayerRemoved(id.to_string()));
        self.repaint.request();
        Ok(())
    }

    /// Finish "style loading": raise `Load`, attach waiting layers and schedule
    /// the first repaint.
    pub fn load<R: SceneRenderer>(
        &mut self,
        stack: &mut LayerStack<R>,
        ctx: &R::Context,
    ) -> Result<(), LayerError> {
        if self.loaded {
            return Ok(());
        }
        self.loaded = true;
        self.events.emit(MapEvent::Load);
        stack.handle_ready(self, ctx)?;
        self.repaint.request();
        info!(
            lng = self.camera.center_lng,
            lat = self.camera.center_lat,
            zoom = self.camera.zoom,
            "map loaded"
        );
        Ok(())
    }

    /// Draw while repaints are pending, at most `max_frames` times.
    /// `before_layers` runs first on each frame and stands in for the map's
    /// own drawing. Returns the number of frames drawn.
    pub fn run<R: SceneRenderer>(
        &mut self,
        stack: &mut LayerStack<R>,
        ctx: &R::Context,
        target: &R::Target,
        max_frames: u64,
        mut before_layers: impl FnMut(&FrameArgs),
    ) -> Result<u64, LayerError> {
        if !self.is_loaded() {
            return Ok(0);
        }
        let mut drawn = 0;
        while drawn < max_frames && self.repaint.take() {
            let args = FrameArgs {
                frame: self.clock.tick(),
                main_matrix: self.camera.main_matrix(),
            };
            before_layers(&args);
            stack.render(self, ctx, target, &args)?;
            self.events.emit(MapEvent::Render {
                frame_index: args.frame.index,
            });
            debug!(frame = args.frame.index, "map repainted");
            drawn += 1;
        }
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::HeadlessMap;
    use crate::config::{MapOptions, Viewport};
    use gpu::RecordingRenderer;
    use layers::{BeamLayer, BeamLayerConfig, LayerStack};
    use pretty_assertions::assert_eq;
    use runtime::MapEvent;

    fn map() -> HeadlessMap {
        HeadlessMap::new(&MapOptions::default(), Viewport::default())
    }

    fn beam() -> Box<BeamLayer<RecordingRenderer>> {
        Box::new(BeamLayer::new(BeamLayerConfig::default()).unwrap())
    }

    #[test]
    fn nothing_is_drawn_before_load() {
        let mut map = map();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        map.add_layer(&mut stack, &(), beam()).unwrap();
        assert!(!stack.get("3d-model").unwrap().is_attached());
        assert!(!map.is_loaded());
        assert_eq!(map.run(&mut stack, &(), &(), 10, |_| {}).unwrap(), 0);
    }

    #[test]
    fn load_attaches_and_beam_keeps_the_loop_alive() {
        let mut map = map();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        map.add_layer(&mut stack, &(), beam()).unwrap();
        map.load(&mut stack, &()).unwrap();
        assert!(stack.get("3d-model").unwrap().is_attached());

        let mut seen = Vec::new();
        let drawn = map
            .run(&mut stack, &(), &(), 5, |args| seen.push(args.frame.index))
            .unwrap();
        assert_eq!(drawn, 5);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);

        let events = map.drain_events();
        assert_eq!(events[0], MapEvent::LayerAdded("3d-model".into()));
        assert_eq!(events[1], MapEvent::Load);
        assert_eq!(events.last(), Some(&MapEvent::Render { frame_index: 4 }));
    }

    #[test]
    fn without_layers_only_one_frame_is_drawn() {
        let mut map = map();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        map.load(&mut stack, &()).unwrap();
        let drawn = map.run(&mut stack, &(), &(), 100, |_| {}).unwrap();
        assert_eq!(drawn, 1);
    }

    #[test]
    fn removing_the_beam_stops_repaints() {
        let mut map = map();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        map.add_layer(&mut stack, &(), beam()).unwrap();
        map.load(&mut stack, &()).unwrap();
        map.run(&mut stack, &(), &(), 3, |_| {}).unwrap();

        map.remove_layer(&mut stack, "3d-model").unwrap();
        // The removal repaint is drawn, then nothing asks for another.
        assert_eq!(map.run(&mut stack, &(), &(), 100, |_| {}).unwrap(), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn load_is_idempotent() {
        let mut map = map();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        map.load(&mut stack, &()).unwrap();
        map.load(&mut stack, &()).unwrap();
        let loads = map
            .drain_events()
            .into_iter()
            .filter(|e| *e == MapEvent::Load)
            .count();
        assert_eq!(loads, 1);
    }
}
