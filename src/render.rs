//! Read-only view of a simulation handed to whatever draws it.

use crate::body::{Body, Color};
use crate::error::Result;
use crate::vector::Vec3;
use std::collections::VecDeque;

/// One body as seen by a render target for a single tick.
#[derive(Debug, Clone, Copy)]
pub struct BodySnapshot<'a> {
    pub index: usize,
    pub position: Vec3,
    pub trail: &'a VecDeque<Vec3>,
    pub color: Color,
}

impl<'a> BodySnapshot<'a> {
    pub fn of(index: usize, body: &'a Body) -> Self {
        Self {
            index,
            position: body.position,
            trail: body.trail(),
            color: body.color(),
        }
    }
}

/// Receives one snapshot per body, in body-index order, after every step.
pub trait RenderTarget {
    fn on_tick(&mut self, tick: u64, bodies: &[BodySnapshot<'_>]) -> Result<()>;

    /// Called after the simulation has been reset, before the next tick.
    fn on_reset(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Target that draws nothing, for headless stepping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTarget;

impl RenderTarget for NullTarget {
    fn on_tick(&mut self, _tick: u64, _bodies: &[BodySnapshot<'_>]) -> Result<()> {
        Ok(())
    }
}
