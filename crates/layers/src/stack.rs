use gpu::SceneRenderer;
use tracing::{debug, info, warn};

use crate::error::LayerError;
use crate::layer::{CustomLayer, FrameArgs, MapHandle};

/// Host-side list of custom layers, drawn in insertion order.
///
/// Layers added before the map is ready wait for [`LayerStack::handle_ready`];
/// layers added afterwards are attached immediately.
pub struct LayerStack<R: SceneRenderer> {
    ready: bool,
    layers: Vec<Box<dyn CustomLayer<R>>>,
}

impl<R: SceneRenderer> Default for LayerStack<R> {
    fn default() -> Self {
        Self {
            ready: false,
            layers: Vec::new(),
        }
    }
}

impl<R: SceneRenderer> LayerStack<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&dyn CustomLayer<R>> {
        self.layers.iter().find(|l| l.id() == id).map(|l| &**l)
    }

    pub fn add_layer(
        &mut self,
        map: &mut dyn MapHandle,
        ctx: &R::Context,
        mut layer: Box<dyn CustomLayer<R>>,
    ) -> Result<(), LayerError> {
        if self.get(layer.id()).is_some() {
            return Err(LayerError::DuplicateId(layer.id().to_string()));
        }
        if self.ready {
            layer.on_attach(map, ctx)?;
        }
        debug!(layer = layer.id(), ready = self.ready, "layer added");
        self.layers.push(layer);
        Ok(())
    }

    /// Attach every layer that is not attached yet. A layer that fails does not
    /// keep the others from attaching; the first failure is returned and a
    /// later call retries the layers still detached.
    pub fn handle_ready(&mut self, map: &mut dyn MapHandle, ctx: &R::Context) -> Result<(), LayerError> {
        self.ready = true;
        let mut attached = 0;
        let mut first_err = None;
        for layer in &mut self.layers {
            if layer.is_attached() {
                continue;
            }
            match layer.on_attach(map, ctx) {
                Ok(()) => attached += 1,
                Err(err) => {
                    warn!(layer = layer.id(), error = %err, "layer failed to attach");
                    first_err.get_or_insert(err);
                }
            }
        }
        if attached > 0 {
            info!(layers = attached, "map ready, custom layers attached");
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn render(
        &mut self,
        map: &mut dyn MapHandle,
        ctx: &R::Context,
        target: &R::Target,
        args: &FrameArgs,
    ) -> Result<(), LayerError> {
        for layer in &mut self.layers {
            if layer.is_attached() {
                layer.on_render(map, ctx, target, args)?;
            }
        }
        Ok(())
    }

    pub fn remove_layer(&mut self, id: &str) -> Result<(), LayerError> {
        let pos = self
            .layers
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| LayerError::UnknownLayer(id.to_string()))?;
        let mut layer = self.layers.remove(pos);
        layer.on_remove();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::LayerStack;
    use crate::beam::BeamLayer;
    use crate::config::BeamLayerConfig;
    use crate::error::LayerError;
    use crate::layer::{CustomLayer, FrameArgs, MapHandle};
    use foundation::math::Mat4;
    use foundation::time::Time;
    use gpu::RecordingRenderer;
    use runtime::Frame;

    #[derive(Default)]
    struct CountingMap {
        repaints: u32,
    }

    impl MapHandle for CountingMap {
        fn request_repaint(&mut self) {
            self.repaints += 1;
        }
    }

    /// Fails its first attach, then behaves.
    struct FailsOnce {
        tries: u32,
        attached: bool,
    }

    impl CustomLayer<RecordingRenderer> for FailsOnce {
        fn id(&self) -> &str {
            "fails-once"
        }

        fn is_attached(&self) -> bool {
            self.attached
        }

        fn on_attach(&mut self, _map: &mut dyn MapHandle, _ctx: &()) -> Result<(), LayerError> {
            self.tries += 1;
            if self.tries == 1 {
                return Err(LayerError::InvalidConfig {
                    layer: "fails-once".into(),
                    reason: "first attach".into(),
                });
            }
            self.attached = true;
            Ok(())
        }

        fn on_render(
            &mut self,
            _map: &mut dyn MapHandle,
            _ctx: &(),
            _target: &(),
            _args: &FrameArgs,
        ) -> Result<(), LayerError> {
            Ok(())
        }
    }

    fn beam(id: &str) -> Box<BeamLayer<RecordingRenderer>> {
        let cfg = BeamLayerConfig {
            id: id.to_string(),
            ..BeamLayerConfig::default()
        };
        Box::new(BeamLayer::new(cfg).unwrap())
    }

    fn args() -> FrameArgs {
        FrameArgs {
            frame: Frame::new(0, Time(0.0)),
            main_matrix: Mat4::IDENTITY,
        }
    }

    #[test]
    fn layers_wait_for_ready() {
        let mut map = CountingMap::default();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        stack.add_layer(&mut map, &(), beam("a")).unwrap();
        assert!(!stack.get("a").unwrap().is_attached());

        // Nothing attached, so nothing renders or asks for a repaint.
        stack.render(&mut map, &(), &(), &args()).unwrap();
        assert_eq!(map.repaints, 0);

        stack.handle_ready(&mut map, &()).unwrap();
        assert!(stack.get("a").unwrap().is_attached());
        stack.render(&mut map, &(), &(), &args()).unwrap();
        assert_eq!(map.repaints, 1);
    }

    #[test]
    fn late_layers_attach_immediately() {
        let mut map = CountingMap::default();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        stack.handle_ready(&mut map, &()).unwrap();
        stack.add_layer(&mut map, &(), beam("late")).unwrap();
        assert!(stack.get("late").unwrap().is_attached());
    }

    #[test]
    fn ready_twice_is_a_no_op() {
        let mut map = CountingMap::default();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        stack.add_layer(&mut map, &(), beam("a")).unwrap();
        stack.handle_ready(&mut map, &()).unwrap();
        stack.handle_ready(&mut map, &()).unwrap();
        assert!(stack.is_ready());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut map = CountingMap::default();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        stack.add_layer(&mut map, &(), beam("a")).unwrap();
        assert_eq!(
            stack.add_layer(&mut map, &(), beam("a")),
            Err(LayerError::DuplicateId("a".into()))
        );
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut map = CountingMap::default();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        for id in ["a", "b", "c"] {
            stack.add_layer(&mut map, &(), beam(id)).unwrap();
        }
        stack.remove_layer("b").unwrap();
        assert_eq!(stack.ids(), vec!["a", "c"]);
        assert_eq!(
            stack.remove_layer("b"),
            Err(LayerError::UnknownLayer("b".into()))
        );
    }

    #[test]
    fn failed_attach_does_not_strand_later_layers() {
        let mut map = CountingMap::default();
        let mut stack = LayerStack::<RecordingRenderer>::new();
        let flaky = FailsOnce {
            tries: 0,
            attached: false,
        };
        stack.add_layer(&mut map, &(), Box::new(flaky)).unwrap();
        stack.add_layer(&mut map, &(), beam("beam")).unwrap();

        assert!(matches!(
            stack.handle_ready(&mut map, &()),
            Err(LayerError::InvalidConfig { .. })
        ));
        assert!(stack.is_ready());
        assert!(!stack.get("fails-once").unwrap().is_attached());
        assert!(stack.get("beam").unwrap().is_attached());

        // A second ready retries only what is still detached.
        stack.handle_ready(&mut map, &()).unwrap();
        assert!(stack.get("fails-once").unwrap().is_attached());
        assert!(stack.get("beam").unwrap().is_attached());
    }
}
