use log::{info, warn};

use super::{UNIFORM_COUNT, UNIFORMS, UniformGroup, UniformSlot, UniformType};
use crate::{GraphicsDevice, GraphicsError, Result, UniformLocation, UniformValue};

/// Outcome of [`UniformCache::cache_all_locations`]. Missing names are not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheReport {
    pub found: usize,
    pub missing: Vec<(UniformGroup, &'static str)>,
}

impl CacheReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_in(&self, group: UniformGroup) -> impl Iterator<Item = &'static str> + '_ {
        self.missing
            .iter()
            .filter(move |(missing_group, _)| *missing_group == group)
            .map(|(_, name)| *name)
    }
}

/// Uniform locations of the current program, resolved once per program.
#[derive(Debug, Clone)]
pub struct UniformCache {
    program: u32,
    locations: [UniformLocation; UNIFORM_COUNT],
}

impl Default for UniformCache {
    fn default() -> Self {
        Self {
            program: 0,
            locations: [UniformLocation::NOT_FOUND; UNIFORM_COUNT],
        }
    }
}

impl UniformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets `program` and forgets every cached location.
    pub fn set_program(&mut self, program: u32) -> Result<()> {
        if program == 0 {
            return Err(GraphicsError::InvalidProgram);
        }
        self.program = program;
        self.locations = [UniformLocation::NOT_FOUND; UNIFORM_COUNT];
        Ok(())
    }

    pub fn program(&self) -> u32 {
        self.program
    }

    /// Resolves every uniform of the contract and binds samplers to their units.
    pub fn cache_all_locations(&mut self, device: &dyn GraphicsDevice) -> Result<CacheReport> {
        if self.program == 0 {
            return Err(GraphicsError::InvalidProgram);
        }

        device.use_program(self.program);
        let mut report = CacheReport::default();
        for spec in &UNIFORMS {
            let location = device.uniform_location(self.program, spec.name);
            self.locations[spec.slot as usize] = location;

            if !location.is_found() {
                warn!("uniform {} ({}) not found in program {}", spec.name, spec.group, self.program);
                report.missing.push((spec.group, spec.name));
                continue;
            }
            report.found += 1;
            if let UniformType::Sampler(unit) = spec.ty {
                device.set_uniform(location, UniformValue::Int(unit as i32));
            }
        }

        for group in UniformGroup::ALL {
            let missing = report.missing_in(group).count();
            let total = UNIFORMS.iter().filter(|spec| spec.group == group).count();
            info!("{group} uniforms: {}/{total} found", total - missing);
        }
        Ok(report)
    }

    pub fn get(&self, slot: UniformSlot) -> UniformLocation {
        self.locations[slot as usize]
    }
}
