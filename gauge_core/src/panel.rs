//! An ordered set of independent gauges addressed by name.

use std::collections::HashSet;

use eyre::WrapErr;

use crate::error::{GaugeError, Result};
use crate::gauge::Gauge;
use crate::resolver::Resolution;
use crate::status::{HomingReport, TickStatus};

/// Gauges share nothing; the panel only sequences them.
#[derive(Debug, Default)]
pub struct Panel {
    gauges: Vec<Gauge>,
}

impl Panel {
    /// Gauge names must be unique.
    pub fn new(gauges: Vec<Gauge>) -> Result<Self> {
        let mut seen = HashSet::new();
        for g in &gauges {
            if !seen.insert(g.name().to_owned()) {
                return Err(eyre::Report::new(GaugeError::Config(format!(
                    "duplicate gauge '{}'",
                    g.name()
                ))));
            }
        }
        Ok(Self { gauges })
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gauge> {
        self.gauges.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Gauge> {
        self.gauges.iter().find(|g| g.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Gauge> {
        self.gauges.iter_mut().find(|g| g.name() == name)
    }

    pub fn initialize_all(&mut self) {
        for g in &mut self.gauges {
            g.initialize();
        }
    }

    /// Home every gauge in declaration order, stopping at the first failure.
    pub fn home_all(&mut self) -> Result<Vec<(String, HomingReport)>> {
        let mut reports = Vec::with_capacity(self.gauges.len());
        for g in &mut self.gauges {
            let report = g
                .home()
                .wrap_err_with(|| format!("homing gauge '{}'", g.name()))?;
            reports.push((g.name().to_owned(), report));
        }
        Ok(reports)
    }

    /// Tick every gauge once, in declaration order.
    pub fn tick_all(&mut self) -> Result<Vec<TickStatus>> {
        self.gauges
            .iter_mut()
            .map(|g| {
                let name = g.name().to_owned();
                g.tick().wrap_err_with(|| format!("tick gauge '{name}'"))
            })
            .collect()
    }

    /// Route one host value to the named gauge.
    pub fn set_value(&mut self, name: &str, raw: u16, climb_rate: i32) -> Result<Resolution> {
        let g = self.get_mut(name).ok_or_else(|| {
            eyre::Report::new(GaugeError::Config(format!("unknown gauge '{name}'")))
        })?;
        Ok(g.update_target(raw, climb_rate))
    }

    pub fn is_idle(&self) -> bool {
        self.gauges.iter().all(Gauge::is_idle)
    }

    pub fn hard_stop_all(&mut self) {
        for g in &mut self.gauges {
            g.hard_stop();
        }
    }
}
