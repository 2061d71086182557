use log::{trace, warn};

use crate::{DrawCounts, FrameStats, ModelRenderer, Scene, Vec3};

/// Contexte fourni à chaque pass lors de l'exécution.
/// Contient des références vers les données par-frame (scène, renderer de modèles, œil, stats).
pub struct PassContext<'a> {
    pub scene: &'a Scene,
    pub models: &'a ModelRenderer<'a>,
    pub eye: Vec3,
    pub stats: &'a mut FrameStats,
}

impl PassContext<'_> {
    fn record(&mut self, counts: DrawCounts) {
        self.stats.models_drawn += counts.drawn;
        self.stats.draws_skipped += counts.skipped;
    }
}

/// Une passe de rendu. `execute` est appelé à chaque frame.
pub trait RenderPass {
    /// Nom (utile pour debug/logging).
    fn name(&self) -> &str;

    fn execute(&self, ctx: &mut PassContext);
}

/// Modèles opaques, dans l'ordre de création.
pub struct OpaquePass;

impl RenderPass for OpaquePass {
    fn name(&self) -> &str {
        "opaque"
    }

    fn execute(&self, ctx: &mut PassContext) {
        let counts = ctx.models.draw_opaque_models(ctx.scene);
        ctx.record(counts);
    }
}

/// Skybox : remplit seulement la profondeur laissée vide par les opaques.
pub struct SkyboxPass;

impl RenderPass for SkyboxPass {
    fn name(&self) -> &str {
        "skybox"
    }

    fn execute(&self, ctx: &mut PassContext) {
        match ctx.models.draw_skybox(ctx.scene, &ctx.eye) {
            Ok(drawn) => ctx.stats.skybox_drawn = drawn,
            Err(err) => {
                warn!("skipped skybox: {err}");
                ctx.stats.draws_skipped += 1;
            }
        }
    }
}

/// Modèles translucides, du plus loin au plus proche.
pub struct TransparentPass;

impl RenderPass for TransparentPass {
    fn name(&self) -> &str {
        "transparent"
    }

    fn execute(&self, ctx: &mut PassContext) {
        let counts = ctx.models.draw_transparent_models(ctx.scene, &ctx.eye);
        ctx.record(counts);
    }
}

/// Gestionnaire de passes. Garde les passes dans un vecteur et les exécute dans l'ordre.
pub struct PassManager {
    passes: Vec<Box<dyn RenderPass>>,
}

impl PassManager {
    /// Opaque, skybox puis transparent. L'ordre est fixe.
    pub fn standard() -> Self {
        let passes: Vec<Box<dyn RenderPass>> = vec![Box::new(OpaquePass), Box::new(SkyboxPass), Box::new(TransparentPass)];
        Self { passes }
    }

    pub fn names(&self) -> Vec<&str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Execute toutes les passes dans l'ordre.
    pub fn execute_all(&self, ctx: &mut PassContext) {
        for pass in &self.passes {
            trace!("executing pass: {}", pass.name());
            pass.execute(ctx);
        }
    }
}
