//! Preset pass managers by optimization level.

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::manager::PassManager;
use crate::passes::{
    ApplyLayout, BasicRouting, BasisTranslation, CancelInverses, CheckIsa, CheckWidth,
    FixedPoint, NoiseAwareLayout, Optimize1qGates, TrivialLayout, Unroll3q,
};
use crate::property::PropertySet;
use crate::target::Target;

/// Highest supported optimization level.
pub const MAX_OPTIMIZATION_LEVEL: u8 = 3;

/// Build the standard pipeline for a target.
///
/// | Level | Pipeline |
/// |-------|----------|
/// | 0 | width check, unroll, trivial layout, routing, translation, ISA check |
/// | 1 | level 0 plus inverse cancellation and single-qubit fusion |
/// | 2 | level 1 with calibration-aware layout |
/// | 3 | level 2 with the optimization passes iterated to a fixed point |
pub fn generate_preset_pass_manager(optimization_level: u8, target: &Target) -> CompileResult<PassManager> {
    if optimization_level > MAX_OPTIMIZATION_LEVEL {
        return Err(CompileError::InvalidConfiguration(format!(
            "optimization level {optimization_level} (supported: 0-{MAX_OPTIMIZATION_LEVEL})"
        )));
    }

    let mut pm = PassManager::new().with_properties(PropertySet::from_target(target));

    pm.add_pass(CheckWidth);
    pm.add_pass(Unroll3q);
    if optimization_level >= 1 {
        pm.add_pass(CancelInverses);
    }
    if optimization_level >= 2 {
        pm.add_pass(NoiseAwareLayout);
    } else {
        pm.add_pass(TrivialLayout);
    }
    pm.add_pass(ApplyLayout);
    pm.add_pass(BasicRouting);
    pm.add_pass(BasisTranslation);
    match optimization_level {
        0 => {}
        1 | 2 => {
            pm.add_pass(Optimize1qGates);
            pm.add_pass(CancelInverses);
        }
        _ => pm.add_pass(
            FixedPoint::new()
                .with_pass(Optimize1qGates)
                .with_pass(CancelInverses),
        ),
    }
    pm.add_pass(CheckIsa);

    debug!(
        level = optimization_level,
        target = target.name(),
        passes = ?pm.pass_names(),
        "Built preset pass manager"
    );
    Ok(pm)
}
