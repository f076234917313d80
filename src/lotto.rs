use chrono::{DateTime, Local};
use rand::seq::index;
use rand::Rng;

pub const PICK: usize = 6;
pub const HIGHEST: u32 = 45;

/// One set of lottery numbers and when it was drawn.
#[derive(Debug, Clone)]
pub struct Draw {
    pub numbers: [u32; PICK],
    pub drawn_at: DateTime<Local>,
}

impl Draw {
    pub fn numbers_text(&self) -> String {
        let parts: Vec<String> = self.numbers.iter().map(ToString::to_string).collect();
        parts.join(", ")
    }

    pub fn timestamp_text(&self) -> String {
        self.drawn_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Pick six distinct numbers from 1..=45 without replacement, ascending.
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Draw {
    let mut numbers = [0u32; PICK];
    for (slot, i) in numbers
        .iter_mut()
        .zip(index::sample(rng, HIGHEST as usize, PICK))
    {
        *slot = i as u32 + 1;
    }
    numbers.sort_unstable();
    Draw {
        numbers,
        drawn_at: Local::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_draw_is_distinct_sorted_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let d = draw(&mut rng);
            assert!(d.numbers.windows(2).all(|w| w[0] < w[1]));
            assert!(d.numbers.iter().all(|&n| (1..=HIGHEST).contains(&n)));
        }
    }

    #[test]
    fn test_text_rendering() {
        let d = Draw {
            numbers: [3, 11, 19, 24, 38, 45],
            drawn_at: Local::now(),
        };
        assert_eq!(d.numbers_text(), "3, 11, 19, 24, 38, 45");
        assert_eq!(d.timestamp_text().len(), 19);
    }
}
