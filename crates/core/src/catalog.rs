//! Ordered fruit table.
//!
//! Rank is the index into the table: merge eligibility is "same rank and not the
//! last entry", and the merge product is simply `rank + 1`.

use bevy::prelude::*;
use fm_config::{FruitConfig, GameConfig};
use rand::Rng;
use thiserror::Error;

/// Tier index of a fruit. Larger ranks are larger fruits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rank(pub usize);

impl Rank {
    #[inline]
    pub fn next(self) -> Rank {
        Rank(self.0 + 1)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FruitDescriptor {
    pub rank: Rank,
    pub radius: f32,
    /// Visual identifier; the image lives at `<visual>.png`.
    pub visual: String,
    pub color: [f32; 3],
}

impl FruitDescriptor {
    pub fn image_path(&self) -> String {
        format!("{}.png", self.visual)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("fruit table is empty")]
    Empty,
    #[error("fruit rank {rank} has non-positive radius {radius}")]
    NonPositiveRadius { rank: usize, radius: f32 },
    #[error("fruit rank {rank} radius {radius} is not larger than rank {} radius {previous}", .rank - 1)]
    RadiusNotIncreasing {
        rank: usize,
        radius: f32,
        previous: f32,
    },
    #[error("spawn pool size {pool} must be within 1..={len}")]
    SpawnPool { pool: usize, len: usize },
}

/// Immutable fruit table plus the size of the random spawn pool (lowest ranks).
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FruitCatalog {
    fruits: Vec<FruitDescriptor>,
    spawn_pool: usize,
}

impl FruitCatalog {
    pub fn new(fruits: &[FruitConfig], spawn_pool: usize) -> Result<Self, CatalogError> {
        if fruits.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut previous: Option<f32> = None;
        for (rank, f) in fruits.iter().enumerate() {
            if f.radius <= 0.0 || !f.radius.is_finite() {
                return Err(CatalogError::NonPositiveRadius {
                    rank,
                    radius: f.radius,
                });
            }
            if let Some(prev) = previous {
                if f.radius <= prev {
                    return Err(CatalogError::RadiusNotIncreasing {
                        rank,
                        radius: f.radius,
                        previous: prev,
                    });
                }
            }
            previous = Some(f.radius);
        }
        if spawn_pool == 0 || spawn_pool > fruits.len() {
            return Err(CatalogError::SpawnPool {
                pool: spawn_pool,
                len: fruits.len(),
            });
        }
        Ok(Self::from_checked(fruits, spawn_pool))
    }

    pub fn from_config(cfg: &GameConfig) -> Result<Self, CatalogError> {
        Self::new(&cfg.fruits, cfg.spawn.pool_size)
    }

    fn from_checked(fruits: &[FruitConfig], spawn_pool: usize) -> Self {
        let fruits = fruits
            .iter()
            .enumerate()
            .map(|(i, f)| FruitDescriptor {
                rank: Rank(i),
                radius: f.radius,
                visual: f.name.clone(),
                color: f.color,
            })
            .collect();
        Self { fruits, spawn_pool }
    }

    pub fn len(&self) -> usize {
        self.fruits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fruits.is_empty()
    }

    pub fn get(&self, rank: Rank) -> Option<&FruitDescriptor> {
        self.fruits.get(rank.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FruitDescriptor> {
        self.fruits.iter()
    }

    pub fn max_rank(&self) -> Rank {
        Rank(self.fruits.len().saturating_sub(1))
    }

    /// Rank produced by merging two fruits of `rank`, or `None` at the top tier.
    pub fn merge_result(&self, rank: Rank) -> Option<Rank> {
        if rank.0 < self.max_rank().0 {
            Some(rank.next())
        } else {
            None
        }
    }

    pub fn spawn_pool(&self) -> usize {
        self.spawn_pool
    }

    /// Uniform pick among ranks `0..spawn_pool`.
    pub fn random_spawn_rank<R: Rng>(&self, rng: &mut R) -> Rank {
        Rank(rng.gen_range(0..self.spawn_pool))
    }
}

impl Default for FruitCatalog {
    fn default() -> Self {
        Self::from_checked(&fm_config::default_fruits(), 5)
    }
}
