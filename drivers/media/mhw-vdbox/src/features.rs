//! # VDBOX Feature Contributors
//!
//! Independently configured contributors that adjust Gen12 VDBOX commands
//! through the feature chain.

use helix_mhw::{Capabilities, Feature, FeatureId, MemCompState};

use crate::gen12::{Gen12, Gen12ParamsMut, HcpSurfaceState, VdControlState, VdPipelineFlush};
use crate::params::FlushFlags;

/// Id of [`ScalabilityFeature`]
pub const SCALABILITY_FEATURE_ID: FeatureId = FeatureId(1);

/// Id of [`MmcFeature`]
pub const MMC_FEATURE_ID: FeatureId = FeatureId(2);

// =============================================================================
// SCALABILITY
// =============================================================================

/// Multi-pipe (scalable) decode.
///
/// With more than one pipe, takes the scalable pipe lock on VD_CONTROL_STATE
/// and makes the pipeline flush also wait on MFX.
#[derive(Debug)]
pub struct ScalabilityFeature {
    /// Number of VDBOX pipes in use
    pipes: u8,
    caps: Capabilities<Gen12>,
}

impl ScalabilityFeature {
    /// Contributor for `pipes` pipes
    pub fn new(pipes: u8) -> Self {
        Self {
            pipes,
            caps: Capabilities::new()
                .with::<VdControlState>()
                .with::<VdPipelineFlush>(),
        }
    }

    /// Whether more than one pipe is in use
    pub fn is_scalable(&self) -> bool {
        self.pipes > 1
    }
}

impl Feature<Gen12> for ScalabilityFeature {
    fn id(&self) -> FeatureId {
        SCALABILITY_FEATURE_ID
    }

    fn name(&self) -> &'static str {
        "scalability"
    }

    fn capabilities(&self) -> &Capabilities<Gen12> {
        &self.caps
    }

    fn set_params(&self, params: Gen12ParamsMut<'_>) {
        if !self.is_scalable() {
            return;
        }

        match params {
            Gen12ParamsMut::VdControlState(par) => {
                par.scalable_mode_pipe_lock = true;
                par.scalable_mode_pipe_unlock = false;
            }
            Gen12ParamsMut::VdPipelineFlush(par) => {
                par.flags |= FlushFlags::WAIT_DONE_MFX;
            }
            _ => {}
        }
    }
}

// =============================================================================
// MEMORY COMPRESSION
// =============================================================================

/// Memory compression of the decoded surface.
///
/// Overrides whatever compression state earlier contributors set.
#[derive(Debug)]
pub struct MmcFeature {
    state: MemCompState,
    caps: Capabilities<Gen12>,
}

impl MmcFeature {
    /// Contributor forcing `state`
    pub fn new(state: MemCompState) -> Self {
        Self {
            state,
            caps: Capabilities::new().with::<HcpSurfaceState>(),
        }
    }

    /// Forced compression state
    pub fn state(&self) -> MemCompState {
        self.state
    }
}

impl Feature<Gen12> for MmcFeature {
    fn id(&self) -> FeatureId {
        MMC_FEATURE_ID
    }

    fn name(&self) -> &'static str {
        "mmc"
    }

    fn capabilities(&self) -> &Capabilities<Gen12> {
        &self.caps
    }

    fn set_params(&self, params: Gen12ParamsMut<'_>) {
        if let Gen12ParamsMut::HcpSurfaceState(par) = params {
            par.mmc_state = self.state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen12::{MfxWait, MiNoop};
    use crate::params::{HcpSurfaceStatePar, VdControlStatePar};
    use alloc::boxed::Box;
    use helix_mhw::FeatureChain;

    #[test]
    fn test_scalability_single_pipe_is_inert() {
        let mut chain = FeatureChain::<Gen12>::new();
        chain.register(Box::new(ScalabilityFeature::new(1))).unwrap();

        let mut par = VdControlStatePar::default();
        assert_eq!(chain.apply::<VdControlState>(None, &mut par), 1);
        assert!(!par.scalable_mode_pipe_lock);
    }

    #[test]
    fn test_scalability_capabilities() {
        let feature = ScalabilityFeature::new(2);
        assert!(feature.capabilities().contains::<VdControlState>());
        assert!(feature.capabilities().contains::<VdPipelineFlush>());
        assert!(!feature.capabilities().contains::<MfxWait>());
        assert!(!feature.capabilities().contains::<MiNoop>());
    }

    #[test]
    fn test_mmc_last_writer_wins() {
        let mut chain = FeatureChain::<Gen12>::new();
        chain.register(Box::new(MmcFeature::new(MemCompState::Mc))).unwrap();
        chain.register(Box::new(ScalabilityFeature::new(4))).unwrap();

        let mut par = HcpSurfaceStatePar {
            mmc_state: MemCompState::Rc,
            ..Default::default()
        };
        assert_eq!(chain.apply::<HcpSurfaceState>(None, &mut par), 1);
        assert_eq!(par.mmc_state, MemCompState::Mc);
    }
}
