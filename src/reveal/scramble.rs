//! Scramble-then-lock effect.
//!
//! A token starts as noise of its own length. Each tick locks the next
//! character (left to right) to its true value and re-rolls the noise for
//! the rest. After `len` ticks the token is fully resolved and stays that
//! way.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::params::NOISE_ALPHABET;
use crate::timer::{advance_slot, fire_slot, Interval};

pub struct Scramble {
    target: Vec<char>,
    noise: Vec<char>,
    locked: usize,
    timer: Option<Interval>,
}

impl Scramble {
    pub fn new<R: Rng + ?Sized>(target: &str, period: Duration, rng: &mut R) -> Self {
        let target: Vec<char> = target.chars().collect();
        let mut scramble = Self {
            noise: vec![' '; target.len()],
            locked: 0,
            timer: (!target.is_empty()).then(|| Interval::new(period)),
            target,
        };
        scramble.reroll(rng);
        scramble
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: Duration, rng: &mut R) {
        advance_slot(&mut self.timer, dt);
        while fire_slot(&mut self.timer) {
            self.tick(rng);
        }
    }

    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.locked = (self.locked + 1).min(self.target.len());
        if self.is_locked() {
            self.timer = None;
        } else {
            self.reroll(rng);
        }
    }

    fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let alphabet: Vec<char> = NOISE_ALPHABET.chars().collect();
        for slot in self.noise.iter_mut().skip(self.locked) {
            *slot = *alphabet.choose(rng).unwrap_or(&'#');
        }
    }

    /// Current text: locked prefix followed by noise
    pub fn text(&self) -> String {
        self.target[..self.locked]
            .iter()
            .chain(&self.noise[self.locked..])
            .collect()
    }

    pub fn is_locked(&self) -> bool {
        self.locked == self.target.len()
    }

    /// Characters already resolved to their true value
    #[cfg(test)]
    pub(crate) fn locked_len(&self) -> usize {
        self.locked
    }
}
