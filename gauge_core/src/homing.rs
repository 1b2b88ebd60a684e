//! Multi-stage homing against the zero sensor.
//!
//! Stages run strictly in order: offset forward, coarse seek, fine forward,
//! fine seek, move to the initial position. Every wait is a cooperative poll
//! that steps the motor in lockstep with the condition check. Seeks are
//! bounded by their commanded travel and every stage by a wall-clock limit.

use std::time::{Duration, Instant};

use eyre::WrapErr;
use gauge_traits::{MotorDriver, ZeroSensor};
use tracing::{debug, info, warn};

use crate::error::{GaugeError, HomingFailure, Result};
use crate::gauge::GaugeCore;
use crate::hw_error::map_hw_error;
use crate::status::{HomingReport, HomingStage};

impl<M: MotorDriver, Z: ZeroSensor> GaugeCore<M, Z> {
    /// Establish the physical zero and park the needle at its initial position.
    ///
    /// Gauges without a zero sensor return immediately without touching the
    /// motor, the sensor, or the tracked state.
    pub fn home(&mut self) -> Result<HomingReport> {
        if !self.config.zeroable {
            debug!(gauge = %self.config.name, "not zeroable, homing skipped");
            return Ok(HomingReport::skipped(self.state.current_position_steps));
        }

        self.apply_profile(self.motion.homing);
        match self.run_homing() {
            Ok(report) => {
                self.apply_profile(self.motion.run);
                info!(
                    gauge = %self.config.name,
                    coarse_seek_steps = report.coarse_seek_steps,
                    fine_seek_steps = report.fine_seek_steps,
                    position = report.final_position_steps,
                    "homing complete"
                );
                Ok(report)
            }
            Err(e) => {
                self.motor.hard_stop();
                self.state.current_position_steps = self.motor.current_position();
                self.state.target_position_steps = self.state.current_position_steps;
                warn!(gauge = %self.config.name, error = %e, "homing aborted, motor stopped");
                Err(e)
            }
        }
    }

    fn run_homing(&mut self) -> Result<HomingReport> {
        let home = self.config.home_position_steps;
        let initial = self.config.initial_position_steps;
        let settle = Duration::from_millis(self.homing.settle_ms);

        self.pump_relative(HomingStage::OffsetForward, self.homing.offset_forward_steps)?;

        let coarse_seek_steps = self.seek_zero(HomingStage::CoarseSeek)?;
        self.motor.hard_stop();
        self.motor.set_current_position(home);
        self.clock.sleep(settle);

        self.pump_relative(HomingStage::FineForward, self.homing.fine_forward_steps)?;
        self.clock.sleep(settle);

        let fine_seek_steps = self.seek_zero(HomingStage::FineSeek)?;
        self.motor.hard_stop();
        self.clock
            .sleep(Duration::from_millis(self.homing.final_settle_ms));
        self.motor.set_current_position(home);
        self.state.current_position_steps = home;

        if initial != home {
            self.pump_relative(HomingStage::MoveToInitial, initial - home)?;
        }
        self.state.current_position_steps = self.motor.current_position();
        self.state.target_position_steps = self.state.current_position_steps;
        debug!(gauge = %self.config.name, stage = %HomingStage::Done, "homing stage");

        Ok(HomingReport {
            performed: true,
            coarse_seek_steps,
            fine_seek_steps,
            final_position_steps: self.state.current_position_steps,
        })
    }

    /// Command a relative move and step until it completes.
    fn pump_relative(&mut self, stage: HomingStage, steps: i64) -> Result<()> {
        debug!(gauge = %self.config.name, %stage, steps, "homing stage");
        self.motor.move_by(steps);
        let started = self.clock.now();
        while self.motor.distance_to_go() != 0 {
            self.step_once(stage)?;
            self.check_stage_deadline(stage, started)?;
        }
        Ok(())
    }

    /// Travel backward until the sensor fires. Returns the steps travelled.
    fn seek_zero(&mut self, stage: HomingStage) -> Result<u64> {
        debug!(gauge = %self.config.name, %stage, max_steps = self.homing.seek_steps, "homing stage");
        self.motor.move_by(-self.homing.seek_steps);
        let from = self.motor.current_position();
        let started = self.clock.now();
        loop {
            let active = self
                .sensor
                .is_active()
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err_with(|| format!("zero sensor read during {stage}"))?;
            let travelled = from.abs_diff(self.motor.current_position());
            if active {
                return Ok(travelled);
            }
            if self.motor.distance_to_go() == 0 {
                return Err(eyre::Report::new(GaugeError::Homing(
                    HomingFailure::SensorNotFound { stage, travelled },
                )));
            }
            self.step_once(stage)?;
            self.check_stage_deadline(stage, started)?;
        }
    }

    fn step_once(&mut self, stage: HomingStage) -> Result<()> {
        self.motor
            .run()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err_with(|| format!("motor run during {stage}"))?;
        Ok(())
    }

    fn check_stage_deadline(&self, stage: HomingStage, started: Instant) -> Result<()> {
        let timeout_ms = self.homing.stage_timeout_ms;
        if timeout_ms > 0 && self.clock.ms_since(started) >= timeout_ms {
            return Err(eyre::Report::new(GaugeError::Homing(
                HomingFailure::Timeout { stage, timeout_ms },
            )));
        }
        Ok(())
    }
}
