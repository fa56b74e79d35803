//! Grid-partitioned circle collision resolution
//!
//! Every interior cell gathers the bodies in its 3x3 neighbourhood and
//! resolves overlapping pairs with the two-body elastic collision formula,
//! then pushes the pair apart by the overlap. Border cells are never used as
//! neighbourhood centres, although their bodies still take part as
//! neighbours of interior cells.
//!
//! Work is split into column bands. A band touches its own columns plus one
//! halo column on each side, so bands two apart never share a body. Even
//! bands run in parallel and commit, then odd bands do the same against the
//! committed state. Each band works on a private copy of the bodies it
//! touches and the copies are written back after the join.

use std::ops::Range;

use rayon::prelude::*;

use super::body::Body;
use super::grid::SpatialGrid;
use super::vector::Vector2;
use crate::consts::COINCIDENT_EPSILON;

/// Resolve one pair if the circles overlap
///
/// Both post-collision velocities are computed from the pre-collision
/// values. The velocity exchange is deliberately skipped unless the pair is
/// closing along the normal: a pair that is already separating (for example
/// one resolved by a neighbouring window earlier in the substep) is only
/// pushed apart, so overlapping windows never flip it back together.
/// Coincident centres use +x as the collision axis. Returns true if the pair
/// overlapped.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> bool {
    let delta = a.position - b.position;
    let distance = delta.length();
    let reach = a.radius_f() + b.radius_f();
    if distance >= reach {
        return false;
    }

    let (normal, distance) = if distance < COINCIDENT_EPSILON {
        (Vector2::X, 0.0)
    } else {
        (delta / distance, distance)
    };

    let total_mass = a.mass + b.mass;
    let closing = (a.velocity - b.velocity).dot(normal);
    if closing < 0.0 {
        let new_a = a.velocity - normal * (2.0 * b.mass / total_mass * closing);
        let new_b = b.velocity + normal * (2.0 * a.mass / total_mass * closing);
        a.velocity = new_a;
        b.velocity = new_b;
    }

    let push = normal * (0.5 * (reach - distance));
    a.position += push;
    b.position -= push;

    a.collided = true;
    b.collided = true;
    true
}

/// Mutable references to two distinct elements
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Contiguous range of neighbourhood-centre columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    pub columns: Range<usize>,
}

impl Band {
    /// Columns read or written while resolving this band
    pub fn halo(&self) -> Range<usize> {
        self.columns.start - 1..self.columns.end + 1
    }
}

/// Split the interior columns of a `width_cells` wide grid into bands
///
/// Produces up to `2 * thread_count` bands so each parity pass can keep
/// every worker busy. With more than one band, each band is at least two
/// columns wide, which keeps same-parity halos disjoint.
pub fn plan_bands(width_cells: usize, thread_count: usize) -> Vec<Band> {
    if width_cells < 3 {
        return Vec::new();
    }
    let interior = width_cells - 2;
    let count = (2 * thread_count.max(1)).min(interior / 2).max(1);
    let base = interior / count;
    let extra = interior % count;

    let mut bands = Vec::with_capacity(count);
    let mut start = 1;
    for i in 0..count {
        let width = base + usize::from(i < extra);
        bands.push(Band {
            columns: start..start + width,
        });
        start += width;
    }
    bands
}

/// Outcome of resolving one band on its private copy
struct BandResult {
    /// (global body index, updated body)
    bodies: Vec<(usize, Body)>,
    contacts: usize,
}

fn resolve_band(grid: &SpatialGrid, bodies: &[Body], band: &Band) -> BandResult {
    let height = grid.height_cells();
    let span = grid.column_span(band.halo());

    // Copy out every body in the halo, remembering where each cell's run starts
    let mut ids = Vec::new();
    let mut local = Vec::new();
    let mut runs = Vec::with_capacity(span.len());
    for cell_idx in span.clone() {
        let start = local.len();
        for &id in grid.cell(cell_idx) {
            ids.push(id);
            local.push(bodies[id].clone());
        }
        runs.push(start..local.len());
    }

    let mut contacts = 0;
    let mut window = Vec::new();
    for col in band.columns.clone() {
        for row in 1..height - 1 {
            window.clear();
            for c in col - 1..=col + 1 {
                for r in row - 1..=row + 1 {
                    let run = &runs[r + c * height - span.start];
                    window.extend(run.clone());
                }
            }

            for (n, &i) in window.iter().enumerate() {
                for &j in &window[n + 1..] {
                    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
                    let (a, b) = pair_mut(&mut local, lo, hi);
                    if resolve_pair(a, b) {
                        contacts += 1;
                    }
                }
            }
        }
    }

    BandResult {
        bodies: ids.into_iter().zip(local).collect(),
        contacts,
    }
}

/// Runs band resolution on a fixed worker pool
pub struct CollisionResolver {
    thread_count: usize,
    pool: Option<rayon::ThreadPool>,
}

impl CollisionResolver {
    /// Build a resolver with `thread_count` workers
    ///
    /// If the pool cannot be created the resolver runs bands serially.
    pub fn new(thread_count: usize) -> Self {
        let thread_count = thread_count.max(1);
        let pool = if thread_count > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .thread_name(|i| format!("collide-{i}"))
                .build()
            {
                Ok(pool) => Some(pool),
                Err(e) => {
                    log::warn!("Collision pool unavailable, resolving serially: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Self { thread_count, pool }
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Resolve all interior neighbourhoods of a partitioned grid
    ///
    /// Returns the number of overlapping pairs handled (a pair seen by
    /// several windows counts once per window).
    pub fn resolve(&self, grid: &SpatialGrid, bodies: &mut [Body]) -> usize {
        let bands = plan_bands(grid.width_cells(), self.thread_count);
        if bands.is_empty() || grid.height_cells() < 3 {
            return 0;
        }

        let mut contacts = 0;
        for parity in 0..2 {
            let phase: Vec<&Band> = bands.iter().skip(parity).step_by(2).collect();
            let snapshot: &[Body] = bodies;
            let results: Vec<BandResult> = match &self.pool {
                Some(pool) if phase.len() > 1 => pool.install(|| {
                    phase
                        .par_iter()
                        .map(|band| resolve_band(grid, snapshot, band))
                        .collect()
                }),
                _ => phase
                    .iter()
                    .map(|band| resolve_band(grid, snapshot, band))
                    .collect(),
            };

            for result in results {
                contacts += result.contacts;
                for (id, body) in result.bodies {
                    bodies[id] = body;
                }
            }
        }
        contacts
    }
}
