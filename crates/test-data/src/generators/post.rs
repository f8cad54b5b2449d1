//! Post generation: content, authorship, publication state and categories.

use fake::Fake;
use fake::faker::lorem::en::{Paragraphs, Sentence};
use rand::Rng;
use time::{Duration, OffsetDateTime};

use blog::models::{NewPost, PostStatus};

use crate::config::PUBLICATION_PROBABILITY;
use crate::db::SeedError;
use crate::sampling::{Coin, pick_one, sample_distinct};

/// Configuration for post generation.
#[derive(Debug, Clone)]
pub struct PostGenConfig {
    /// Probability that a post gets a publication date.
    pub publication_probability: f64,
    /// Publication dates fall within this many days before now.
    pub publication_window_days: i64,
    /// Upper bound (inclusive) for the views count of a published post.
    pub max_views: i32,
    /// Upper bound on categories attached to one post.
    pub max_categories: usize,
    /// Probability that a post has a featured image URL.
    pub image_probability: f64,
}

impl Default for PostGenConfig {
    fn default() -> Self {
        Self {
            publication_probability: PUBLICATION_PROBABILITY,
            publication_window_days: 3 * 365,
            max_views: 50_000,
            max_categories: 5,
            image_probability: 0.8,
        }
    }
}

/// Generates posts for seeding.
pub struct PostGenerator {
    config: PostGenConfig,
    publication: Coin,
    image: Coin,
}

impl PostGenerator {
    /// Creates a generator, rejecting probabilities outside `0.0..=1.0`.
    pub fn with_config(config: PostGenConfig) -> Result<Self, SeedError> {
        Ok(Self {
            publication: Coin::new(config.publication_probability)?,
            image: Coin::new(config.image_probability)?,
            config,
        })
    }

    pub fn config(&self) -> &PostGenConfig {
        &self.config
    }

    /// Generates a complete post: content, a random author if any, and publication state.
    pub fn generate(&self, user_ids: &[i64], now: OffsetDateTime, rng: &mut impl Rng) -> NewPost {
        let mut post = self.candidate(rng);
        post.user_id = pick_one(user_ids, rng).copied();
        self.assign_publication(&mut post, now, rng);
        post
    }

    /// Generates the raw content of a post with no author and no publication state.
    pub fn candidate(&self, rng: &mut impl Rng) -> NewPost {
        let sentence: String = Sentence(3..8).fake_with_rng(rng);
        let title = sentence.trim_end_matches('.').to_string();
        let paragraphs: Vec<String> = Paragraphs(2..5).fake_with_rng(rng);
        let slug = slugify(&title, rng);
        let status = PostStatus::ALL[rng.gen_range(0..PostStatus::ALL.len())];
        let featured_image_url = self
            .image
            .maybe(rng, |_| format!("https://picsum.photos/seed/{slug}/1200/630"));

        NewPost {
            user_id: None,
            title,
            content: paragraphs.join("\n\n"),
            slug,
            status,
            featured_image_url,
            publication_date: None,
            views_count: None,
        }
    }

    /// Maybe publishes the post; only published posts get a views count.
    pub fn assign_publication(&self, post: &mut NewPost, now: OffsetDateTime, rng: &mut impl Rng) {
        let window = self.config.publication_window_days.max(0) * 86_400;

        post.publication_date = self
            .publication
            .maybe(rng, |r| now - Duration::seconds(r.gen_range(0..=window)));
        post.views_count = match post.publication_date {
            Some(_) => Some(rng.gen_range(1..=self.config.max_views.max(1))),
            None => None,
        };
    }

    /// Picks between 1 and `min(max_categories, len)` distinct category ids, or none if empty.
    pub fn pick_categories(&self, category_ids: &[i64], rng: &mut impl Rng) -> Vec<i64> {
        let upper = self.config.max_categories.min(category_ids.len());
        if upper == 0 {
            return Vec::new();
        }

        let count = rng.gen_range(1..=upper);
        sample_distinct(category_ids, count, rng)
    }
}

/// Builds a URL slug from a title plus a random suffix for uniqueness.
fn slugify(title: &str, rng: &mut impl Rng) -> String {
    let base = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    let suffix: u32 = rng.r#gen();
    format!("{base}-{suffix:08x}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn generator() -> PostGenerator {
        PostGenerator::with_config(PostGenConfig::default()).unwrap()
    }

    #[test]
    fn test_candidate_has_content_and_no_state() {
        let mut rng = StdRng::seed_from_u64(21);
        let post = generator().candidate(&mut rng);

        assert!(!post.title.is_empty());
        assert!(!post.title.ends_with('.'));
        assert!(!post.content.is_empty());
        assert!(
            post.slug
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-')
        );
        assert!(post.user_id.is_none());
        assert!(post.publication_date.is_none());
        assert!(post.views_count.is_none());
    }

    #[test]
    fn test_views_only_on_published_posts() {
        let mut rng = StdRng::seed_from_u64(22);
        let post_gen = generator();
        let now = OffsetDateTime::now_utc();
        let earliest = now - Duration::days(post_gen.config().publication_window_days);

        let mut published = 0;
        for _ in 0..500 {
            let post = post_gen.generate(&[1, 2, 3], now, &mut rng);
            match post.publication_date {
                Some(date) => {
                    published += 1;
                    assert!(date <= now && date >= earliest);
                    let views = post.views_count.expect("published post without views");
                    assert!((1..=50_000).contains(&views));
                }
                None => assert!(post.views_count.is_none()),
            }
        }

        // 50% publication probability
        assert!(published > 180 && published < 320, "published {published}/500");
    }

    #[test]
    fn test_author_is_none_without_users() {
        let mut rng = StdRng::seed_from_u64(23);
        let post_gen = generator();
        let now = OffsetDateTime::now_utc();

        assert!(post_gen.generate(&[], now, &mut rng).user_id.is_none());

        let authors: HashSet<_> = (0..100)
            .filter_map(|_| post_gen.generate(&[5, 6], now, &mut rng).user_id)
            .collect();
        assert_eq!(authors, HashSet::from([5, 6]));
    }

    #[test]
    fn test_never_publish() {
        let mut rng = StdRng::seed_from_u64(24);
        let post_gen = PostGenerator::with_config(PostGenConfig {
            publication_probability: 0.0,
            ..Default::default()
        })
        .unwrap();

        for _ in 0..50 {
            let post = post_gen.generate(&[1], OffsetDateTime::now_utc(), &mut rng);
            assert!(post.publication_date.is_none());
            assert!(post.views_count.is_none());
        }
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let result = PostGenerator::with_config(PostGenConfig {
            publication_probability: 2.0,
            ..Default::default()
        });
        assert!(matches!(result, Err(SeedError::InvalidProbability(_))));
    }

    #[test]
    fn test_pick_categories_bounds() {
        let mut rng = StdRng::seed_from_u64(25);
        let post_gen = generator();

        assert!(post_gen.pick_categories(&[], &mut rng).is_empty());

        for category_count in 1..=8 {
            let ids: Vec<i64> = (1..=category_count).collect();
            let upper = 5.min(ids.len());
            for _ in 0..50 {
                let picked = post_gen.pick_categories(&ids, &mut rng);
                assert!((1..=upper).contains(&picked.len()));
                let unique: HashSet<_> = picked.iter().collect();
                assert_eq!(unique.len(), picked.len());
            }
        }
    }

    #[test]
    fn test_pick_categories_reaches_full_range() {
        let mut rng = StdRng::seed_from_u64(26);
        let post_gen = generator();
        let ids = [10, 20, 30, 40, 50];

        let sizes: HashSet<usize> = (0..500)
            .map(|_| post_gen.pick_categories(&ids, &mut rng).len())
            .collect();
        assert_eq!(sizes, HashSet::from([1, 2, 3, 4, 5]));
    }
}
