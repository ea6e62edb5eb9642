//! Light beam standing on a geographic anchor, drawn as a custom map layer.

use foundation::math::Vec3;
use gpu::{RendererOptions, SceneRenderer};
use scene::components::{DirectionalLight, Transform};
use scene::prefabs::light_beam;
use scene::{Camera, MeshId, Scene};
use tracing::{debug, info};

use crate::compositor::compose_projection;
use crate::config::BeamLayerConfig;
use crate::error::LayerError;
use crate::layer::{CustomLayer, FrameArgs, MapHandle, RenderingMode};
use crate::model_transform::ModelTransform;

/// Everything that exists only while the layer is on a map.
#[derive(Debug)]
pub struct AttachedBeam<R> {
    pub scene: Scene,
    pub camera: Camera,
    pub renderer: R,
    pub beam: MeshId,
}

#[derive(Debug)]
enum State<R> {
    Detached,
    Attached(AttachedBeam<R>),
}

#[derive(Debug)]
pub struct BeamLayer<R> {
    config: BeamLayerConfig,
    transform: ModelTransform,
    state: State<R>,
}

impl<R: SceneRenderer> BeamLayer<R> {
    pub fn new(config: BeamLayerConfig) -> Result<Self, LayerError> {
        config.validate()?;
        let transform = config.model_transform();
        Ok(Self {
            config,
            transform,
            state: State::Detached,
        })
    }

    pub fn config(&self) -> &BeamLayerConfig {
        &self.config
    }

    pub fn model_transform(&self) -> &ModelTransform {
        &self.transform
    }

    pub fn attached(&self) -> Option<&AttachedBeam<R>> {
        match &self.state {
            State::Attached(a) => Some(a),
            State::Detached => None,
        }
    }

    fn build_scene(&self) -> (Scene, MeshId) {
        let mut scene = Scene::new();
        for &p in &self.config.light_positions {
            scene.add_light(DirectionalLight::white_from(Vec3::from(p)));
        }
        let beam = scene.add_mesh(light_beam(
            self.config.beam,
            Transform::rotate(self.config.mesh_rotation()),
        ));
        (scene, beam)
    }
}

impl<R: SceneRenderer> CustomLayer<R> for BeamLayer<R> {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn rendering_mode(&self) -> RenderingMode {
        RenderingMode::ThreeD
    }

    fn is_attached(&self) -> bool {
        matches!(self.state, State::Attached(_))
    }

    fn on_attach(&mut self, _map: &mut dyn MapHandle, ctx: &R::Context) -> Result<(), LayerError> {
        if self.is_attached() {
            return Err(LayerError::AlreadyAttached(self.config.id.clone()));
        }

        let (scene, beam) = self.build_scene();
        let renderer =
            R::bind(ctx, RendererOptions::shared_context()).map_err(|source| LayerError::Gpu {
                layer: self.config.id.clone(),
                source,
            })?;

        info!(
            layer = %self.config.id,
            lon = self.config.anchor.longitude,
            lat = self.config.anchor.latitude,
            scale = self.transform.scale,
            "beam layer attached"
        );
        self.state = State::Attached(AttachedBeam {
            scene,
            camera: Camera::new(),
            renderer,
            beam,
        });
        Ok(())
    }

    fn on_render(
        &mut self,
        map: &mut dyn MapHandle,
        ctx: &R::Context,
        target: &R::Target,
        args: &FrameArgs,
    ) -> Result<(), LayerError> {
        let State::Attached(attached) = &mut self.state else {
            return Err(LayerError::NotAttached(self.config.id.clone()));
        };

        attached.camera.projection_matrix = compose_projection(&args.main_matrix, &self.transform);
        attached.renderer.reset_state();
        let stats = attached
            .renderer
            .render(ctx, target, &attached.scene, &attached.camera)
            .map_err(|source| LayerError::Gpu {
                layer: self.config.id.clone(),
                source,
            })?;
        debug!(
            layer = %self.config.id,
            frame = args.frame.index,
            draw_calls = stats.draw_calls,
            "beam layer rendered"
        );

        map.request_repaint();
        Ok(())
    }

    fn on_remove(&mut self) {
        if self.is_attached() {
            info!(layer = %self.config.id, "beam layer removed");
        }
        self.state = State::Detached;
    }
}
