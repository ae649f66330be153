//! Procedural terrain with a single flat landing pad

use glam::Vec2;
use rand::Rng;

use crate::tuning::Tuning;

/// Flat landing interval at a fixed height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingPad {
    pub x_start: f32,
    pub x_end: f32,
    pub y: f32,
}

impl LandingPad {
    pub fn width(&self) -> f32 {
        self.x_end - self.x_start
    }

    /// Inclusive on both ends
    pub fn contains_x(&self, x: f32) -> bool {
        self.x_start <= x && x <= self.x_end
    }
}

/// Ground polyline, ordered by x, immutable once generated
#[derive(Debug, Clone)]
pub struct Terrain {
    pub points: Vec<Vec2>,
    pub landing_pad: Option<LandingPad>,
}

impl Terrain {
    /// Walk left to right: rough points at random heights, except one flat pad
    /// once x enters the pad window.
    pub fn generate<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        let width = tuning.screen_width;
        let height = tuning.screen_height;
        let window = (width * tuning.pad_window.0, width * tuning.pad_window.1);
        let (low, high) = (height * tuning.rough_height.0, height * tuning.rough_height.1);
        let pad_y = tuning.pad_y();

        let mut points = vec![Vec2::new(0.0, rng.random_range(low..=high))];
        let mut landing_pad = None;
        let mut x = 0.0;

        while x < width {
            if landing_pad.is_none() && window.0 <= x && x <= window.1 {
                let pad = LandingPad {
                    x_start: x,
                    x_end: x + tuning.pad_width,
                    y: pad_y,
                };
                points.push(Vec2::new(pad.x_start, pad_y));
                points.push(Vec2::new(pad.x_end, pad_y));
                x = pad.x_end;
                landing_pad = Some(pad);
            } else {
                x += rng.random_range(tuning.rough_step.0..=tuning.rough_step.1);
                points.push(Vec2::new(x, rng.random_range(low..=high)));
            }
        }

        log::debug!(
            "Terrain: {} points, pad {:?}",
            points.len(),
            landing_pad.map(|p| (p.x_start, p.x_end))
        );

        Self { points, landing_pad }
    }

    /// Consecutive point pairs, left to right
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Segments whose x-span contains `x`, with their index, left to right
    pub fn segments_over(&self, x: f32) -> impl Iterator<Item = (usize, Vec2, Vec2)> + '_ {
        self.segments()
            .enumerate()
            .filter(move |(_, (a, b))| a.x <= x && x <= b.x)
            .map(|(i, (a, b))| (i, a, b))
    }
}

/// Height of the segment line at `x`.
///
/// A vertical segment (cliff face) reports its top, so anything below the
/// top edge at that x is under ground.
pub fn segment_height(a: Vec2, b: Vec2, x: f32) -> f32 {
    let span = b.x - a.x;
    if span <= f32::EPSILON {
        a.y.min(b.y)
    } else {
        a.y + (b.y - a.y) * (x - a.x) / span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn generate(seed: u64) -> Terrain {
        Terrain::generate(&Tuning::default(), &mut Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_pad_is_flat_segment() {
        let terrain = generate(42);
        let pad = terrain.landing_pad.expect("default window always yields a pad");
        let start = terrain
            .points
            .iter()
            .position(|p| p.x == pad.x_start && p.y == pad.y)
            .expect("pad start in polyline");
        assert_eq!(terrain.points[start + 1], Vec2::new(pad.x_end, pad.y));
        let (_, a, b) = terrain
            .segments_over(pad.x_start + 50.0)
            .next()
            .expect("segment over the pad");
        assert!((segment_height(a, b, pad.x_start + 50.0) - pad.y).abs() < 1e-4);
    }

    #[test]
    fn test_deterministic_per_seed() {
        assert_eq!(generate(5).points, generate(5).points);
        assert_ne!(generate(5).points, generate(6).points);
    }

    #[test]
    fn test_no_pad_when_window_is_skipped() {
        // Steps wider than the window can jump clean over it
        let tuning = Tuning {
            pad_window: (0.40, 0.41),
            rough_step: (600.0, 600.0),
            ..Default::default()
        };
        let terrain = Terrain::generate(&tuning, &mut Pcg32::seed_from_u64(1));
        assert!(terrain.landing_pad.is_none());
        assert_eq!(terrain.points.len(), 4);
    }

    #[test]
    fn test_segment_height_interpolates() {
        let (a, b) = (Vec2::new(0.0, 100.0), Vec2::new(10.0, 200.0));
        assert_eq!(segment_height(a, b, 5.0), 150.0);
        assert_eq!(segment_height(a, b, 0.0), 100.0);
    }

    #[test]
    fn test_vertical_segment_reports_top() {
        // y grows downward: the top of a cliff is the smaller y
        let top = Vec2::new(400.0, 450.0);
        let foot = Vec2::new(400.0, 504.0);
        assert_eq!(segment_height(top, foot, 400.0), 450.0);
        assert_eq!(segment_height(foot, top, 400.0), 450.0);
    }

    #[test]
    fn test_segments_over_keeps_index() {
        let terrain = Terrain {
            points: vec![
                Vec2::new(0.0, 100.0),
                Vec2::new(10.0, 200.0),
                Vec2::new(10.0, 150.0),
                Vec2::new(30.0, 150.0),
            ],
            landing_pad: None,
        };
        let hits: Vec<usize> = terrain.segments_over(10.0).map(|(i, _, _)| i).collect();
        assert_eq!(hits, vec![0, 1, 2]);
        let hits: Vec<usize> = terrain.segments_over(20.0).map(|(i, _, _)| i).collect();
        assert_eq!(hits, vec![2]);
        assert_eq!(terrain.segments_over(31.0).count(), 0);
    }

    proptest! {
        #[test]
        fn prop_covers_screen_with_one_pad(seed in any::<u64>()) {
            let tuning = Tuning::default();
            let terrain = generate(seed);

            prop_assert_eq!(terrain.points[0].x, 0.0);
            prop_assert!(terrain.points.last().unwrap().x >= tuning.screen_width);
            prop_assert!(terrain.points.windows(2).all(|w| w[0].x <= w[1].x));

            let pad = terrain.landing_pad.unwrap();
            prop_assert!((pad.width() - 100.0).abs() < 1e-3);
            prop_assert!(pad.x_start >= tuning.screen_width / 3.0 - 1e-3);
            prop_assert!(pad.x_start <= tuning.screen_width / 2.0 + 1e-3);

            let flat = terrain.segments()
                .filter(|(a, b)| a.y == pad.y && b.y == pad.y && b.x - a.x == pad.width())
                .count();
            prop_assert_eq!(flat, 1);
        }

        #[test]
        fn prop_rough_heights_in_band(seed in any::<u64>()) {
            let terrain = generate(seed);
            for p in &terrain.points {
                prop_assert!((432.0 - 1e-3..=576.0 + 1e-3).contains(&p.y));
            }
        }
    }
}
