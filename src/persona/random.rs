//! Random sources for variety selection.
//!
//! The engine never touches a global generator directly. Every draw goes
//! through a `RandomSource`, so callers can pass a seeded or scripted source
//! and get exact, repeatable template and jitter choices.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform draws the engine needs.
pub trait RandomSource {
    /// Uniform integer in `0..upper`. `upper` of zero yields zero.
    fn below(&mut self, upper: u32) -> u32;

    /// `true` with probability `p` (clamped into 0.0..=1.0; NaN never fires).
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform index into a non-empty slice of length `len`.
    fn pick_index(&mut self, len: usize) -> usize {
        let upper = u32::try_from(len).unwrap_or(u32::MAX);
        self.below(upper) as usize
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn below(&mut self, upper: u32) -> u32 {
        (**self).below(upper)
    }

    fn chance(&mut self, p: f64) -> bool {
        (**self).chance(p)
    }
}

/// `p` as a valid `gen_bool` argument.
fn probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Draws from the calling thread's generator. Independent invocations on
/// different threads never share state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }

    fn chance(&mut self, p: f64) -> bool {
        rand::thread_rng().gen_bool(probability(p))
    }
}

/// Deterministic generator seeded by the caller (`--seed` on the CLI).
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.rng.gen_range(0..upper)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(probability(p))
    }
}

/// Replays a fixed script of draws.
///
/// `below` pops the next scripted integer (reduced modulo `upper`), `chance`
/// pops the next scripted boolean. An exhausted script yields `0` / `false`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<u32>,
    flips: VecDeque<bool>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.values.extend(values);
        self
    }

    pub fn with_flips(mut self, flips: impl IntoIterator<Item = bool>) -> Self {
        self.flips.extend(flips);
        self
    }

    /// Every `below` draw returns `value` (mod `upper`), every flip `flip`.
    pub fn constant(value: u32, flip: bool) -> Constant {
        Constant { value, flip }
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, upper: u32) -> u32 {
        match (self.values.pop_front(), upper) {
            (_, 0) | (None, _) => 0,
            (Some(v), upper) => v % upper,
        }
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}

/// See [`ScriptedRandom::constant`].
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    value: u32,
    flip: bool,
}

impl RandomSource for Constant {
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            0
        } else {
            self.value % upper
        }
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.flip
    }
}
