use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use quiz_core::model::Question;

use super::supplier::QuestionSupplier;

/// A catalogue entry: poster asset name plus its audience rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movie {
    pub image: &'static str,
    pub rating: f32,
}

/// Built-in catalogue of ten movies.
pub const MOVIES: [Movie; 10] = [
    Movie { image: "The Godfather", rating: 9.2 },
    Movie { image: "The Dark Knight", rating: 9.0 },
    Movie { image: "Kill Bill", rating: 8.1 },
    Movie { image: "The Avengers", rating: 8.0 },
    Movie { image: "Deadpool", rating: 8.0 },
    Movie { image: "The Green Knight", rating: 6.6 },
    Movie { image: "Old", rating: 5.8 },
    Movie { image: "The Ice Age Adventures of Buck Wild", rating: 4.3 },
    Movie { image: "Tesla", rating: 5.1 },
    Movie { image: "Vivarium", rating: 5.8 },
];

const MIN_THRESHOLD: u8 = 5;
const MAX_THRESHOLD: u8 = 8;

/// Asks "is this movie rated higher than N?" for each catalogue movie once per round.
///
/// Movies are drawn in shuffled order; after the last one the factory reports
/// exhaustion until `reset`.
#[derive(Debug, Clone)]
pub struct QuestionFactory {
    movies: Vec<Movie>,
    order: Vec<usize>,
    cursor: usize,
    rng: StdRng,
}

impl QuestionFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic factory for tests and replays.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Use a custom catalogue instead of [`MOVIES`].
    #[must_use]
    pub fn with_movies(mut self, movies: Vec<Movie>) -> Self {
        self.movies = movies;
        self.reshuffle();
        self
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut factory = Self {
            movies: MOVIES.to_vec(),
            order: Vec::new(),
            cursor: 0,
            rng,
        };
        factory.reshuffle();
        factory
    }

    fn reshuffle(&mut self) {
        self.order = (0..self.movies.len()).collect();
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
    }

    fn build_question(&mut self, movie: Movie) -> Option<Question> {
        let threshold = self.rng.random_range(MIN_THRESHOLD..=MAX_THRESHOLD);
        let text = format!("Is this movie rated higher than {threshold}?");
        match Question::new(text, movie.image, movie.rating > f32::from(threshold)) {
            Ok(question) => Some(question),
            Err(err) => {
                tracing::warn!(image = movie.image, %err, "skipping invalid catalogue entry");
                None
            }
        }
    }
}

impl Default for QuestionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionSupplier for QuestionFactory {
    fn next_question(&mut self) -> Option<Question> {
        while let Some(&index) = self.order.get(self.cursor) {
            self.cursor += 1;
            let movie = self.movies[index];
            if let Some(question) = self.build_question(movie) {
                return Some(question);
            }
        }
        None
    }

    fn reset(&mut self) {
        self.reshuffle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn threshold_of(question: &Question) -> f32 {
        question
            .text()
            .trim_start_matches("Is this movie rated higher than ")
            .trim_end_matches('?')
            .parse()
            .unwrap()
    }

    #[test]
    fn serves_each_movie_once_per_round() {
        let mut factory = QuestionFactory::with_seed(7);
        let mut seen = HashSet::new();
        while let Some(question) = factory.next_question() {
            assert!(seen.insert(question.image().to_owned()));
        }
        assert_eq!(seen.len(), MOVIES.len());
    }

    #[test]
    fn answers_follow_the_rating_threshold() {
        let mut factory = QuestionFactory::with_seed(11);
        while let Some(question) = factory.next_question() {
            let threshold = threshold_of(&question);
            assert!((f32::from(MIN_THRESHOLD)..=f32::from(MAX_THRESHOLD)).contains(&threshold));
            let movie = MOVIES.iter().find(|m| m.image == question.image()).unwrap();
            assert_eq!(question.correct_answer(), movie.rating > threshold);
        }
    }

    #[test]
    fn reset_makes_the_catalogue_available_again() {
        let mut factory = QuestionFactory::with_seed(3).with_movies(MOVIES[..2].to_vec());
        assert!(factory.next_question().is_some());
        assert!(factory.next_question().is_some());
        assert!(factory.next_question().is_none());

        factory.reset();
        assert!(factory.next_question().is_some());
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let mut a = QuestionFactory::with_seed(42);
        let mut b = QuestionFactory::with_seed(42);
        for _ in 0..MOVIES.len() {
            assert_eq!(a.next_question(), b.next_question());
        }
    }
}
