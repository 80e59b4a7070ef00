//! Synthetic labeled account generator.
//!
//! Produces a class-separable corpus for training and evaluation: 30% fake
//! accounts whose profile, activity, and engagement features are drawn from
//! class-conditional distributions. Every draw comes from a single seeded
//! stream, so the same seed and reference date reproduce the dataset
//! exactly.
//!
//! Unlike the feature builder, which skips the derived-feature overwrite
//! when a denominator is zero, the generator floors denominators at 1 and
//! always computes the derived values. The divergence is intentional; see
//! DESIGN.md.

use crate::error::Result;
use crate::types::SyntheticAccount;
use chrono::{Duration, NaiveDate, Utc};
use csv::Writer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Probability that a generated account is labeled fake.
pub const FAKE_PROBABILITY: f64 = 0.3;

/// Substrings that mark a username as suspicious. The flag is computed from
/// the username string, never from the ground-truth label.
pub const SUSPICIOUS_SUBSTRINGS: [&str; 4] = ["bot", "fake", "spam", "user"];

const USERNAME_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Seeded generator of labeled synthetic accounts.
pub struct SyntheticDataGenerator {
    rng: StdRng,
    seed: u64,
    /// Anchor for `created_date`; fixed per run so a seed fully determines
    /// the output.
    reference_date: NaiveDate,
}

impl SyntheticDataGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            reference_date: Utc::now().date_naive(),
        }
    }

    /// Pin the creation-date anchor (tests and reproducible runs).
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    /// Generate `n` labeled accounts.
    pub fn generate(&mut self, n: usize) -> Vec<SyntheticAccount> {
        let accounts: Vec<SyntheticAccount> = (0..n).map(|_| self.generate_one()).collect();

        let fake_count = accounts.iter().filter(|a| a.is_fake == 1).count();
        info!(
            samples = n,
            fake = fake_count,
            real = n - fake_count,
            seed = self.seed,
            "Synthetic dataset generated"
        );

        accounts
    }

    /// Generate accounts and write them as a CSV dataset.
    pub fn write_csv<P: AsRef<Path>>(&mut self, n: usize, path: P) -> Result<Vec<SyntheticAccount>> {
        let accounts = self.generate(n);

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = Writer::from_writer(File::create(path)?);
        for account in &accounts {
            writer
                .serialize(account)
                .map_err(|e| crate::error::DetectionError::Dataset(e.to_string()))?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = accounts.len(), "Dataset written");
        Ok(accounts)
    }

    fn generate_one(&mut self) -> SyntheticAccount {
        let is_fake = self.rng.gen_bool(FAKE_PROBABILITY);

        // Fake accounts are usually newer
        let account_age_days: u32 = if is_fake {
            self.rng.gen_range(1..365)
        } else {
            self.rng.gen_range(1..2000)
        };
        let created_date = self.reference_date - Duration::days(account_age_days as i64);

        let username = self.draw_username(is_fake);

        // Profile completeness: fakes skew incomplete and are never verified
        let (has_profile_pic, has_bio, has_location, verified) = if is_fake {
            (
                self.bernoulli(0.6),
                self.bernoulli(0.4),
                self.bernoulli(0.3),
                0,
            )
        } else {
            (
                self.bernoulli(0.9),
                self.bernoulli(0.8),
                self.bernoulli(0.7),
                self.bernoulli(0.05),
            )
        };

        // Activity counts: bimodal mixture for fakes (small bots most of the
        // time, occasionally bought-follower accounts)
        let (mut followers, following, posts_count) = if is_fake {
            let followers = if self.rng.gen::<f64>() < 0.7 {
                self.poisson(50.0)
            } else {
                self.poisson(1000.0)
            };
            let following = if self.rng.gen::<f64>() < 0.6 {
                self.poisson(200.0)
            } else {
                self.poisson(50.0)
            };
            let posts = if self.rng.gen::<f64>() < 0.8 {
                self.poisson(5.0)
            } else {
                self.poisson(100.0)
            };

            if self.rng.gen::<f64>() < 0.3 {
                (self.poisson(1000.0), self.poisson(10.0), posts)
            } else {
                (followers, following, posts)
            }
        } else {
            (
                self.poisson(150.0),
                self.poisson(200.0),
                self.poisson(50.0),
            )
        };

        // Engagement: clipped Gaussians, fakes near zero
        let (mut avg_likes, mut avg_comments, mut avg_shares) = if is_fake {
            (
                self.gaussian(2.0, 5.0).max(0.0),
                self.gaussian(0.5, 2.0).max(0.0),
                self.gaussian(0.2, 1.0).max(0.0),
            )
        } else {
            (
                self.gaussian(20.0, 15.0).max(0.0),
                self.gaussian(5.0, 8.0).max(0.0),
                self.gaussian(2.0, 5.0).max(0.0),
            )
        };

        // Signature injection for fakes: either an extreme follower ratio or
        // force-zeroed engagement, never both for one account
        if is_fake {
            if self.rng.gen::<f64>() < 0.4 {
                followers = following * self.rng.gen_range(10..50);
            } else if self.rng.gen::<f64>() < 0.3 {
                avg_likes = self.rng.gen_range(0..3) as f64;
                avg_comments = 0.0;
                avg_shares = 0.0;
            }
        }

        let (has_website, has_pinned_posts) = if is_fake {
            (self.bernoulli(0.2), self.bernoulli(0.1))
        } else {
            (self.bernoulli(0.4), self.bernoulli(0.3))
        };

        // Derived features, denominators floored at 1
        let followers_following_ratio = followers as f64 / (following.max(1)) as f64;
        let engagement_rate =
            (avg_likes + avg_comments + avg_shares) / (followers.max(1)) as f64;

        let suspicious_username = is_suspicious_username(&username) as u8;
        let low_activity = (posts_count < 5 && account_age_days > 30) as u8;
        let high_follower_ratio = (followers_following_ratio > 10.0) as u8;
        let low_engagement = (engagement_rate < 0.01 && followers > 100) as u8;

        SyntheticAccount {
            username,
            is_fake: is_fake as u8,
            account_age_days,
            followers,
            following,
            posts_count,
            avg_likes,
            avg_comments,
            avg_shares,
            has_profile_pic,
            has_bio,
            has_location,
            verified,
            has_website,
            has_pinned_posts,
            followers_following_ratio,
            engagement_rate,
            suspicious_username,
            low_activity,
            high_follower_ratio,
            low_engagement,
            created_date,
        }
    }

    fn draw_username(&mut self, is_fake: bool) -> String {
        if is_fake {
            match self.rng.gen_range(0..5) {
                0 => format!("user{}", self.rng.gen_range(1000..10000)),
                1 => format!("fake{}", self.rng.gen_range(100..1000)),
                2 => format!("bot{}", self.rng.gen_range(1000..10000)),
                3 => self.random_string(8),
                _ => format!("spam{}", self.rng.gen_range(100..1000)),
            }
        } else {
            let len = self.rng.gen_range(5..15);
            self.random_string(len)
        }
    }

    fn random_string(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| {
                let idx = self.rng.gen_range(0..USERNAME_CHARSET.len());
                USERNAME_CHARSET[idx] as char
            })
            .collect()
    }

    fn bernoulli(&mut self, p: f64) -> u8 {
        self.rng.gen_bool(p) as u8
    }

    /// Poisson sample: Knuth's product method for small rates, rounded
    /// Gaussian approximation for large ones where the product method
    /// underflows.
    fn poisson(&mut self, lambda: f64) -> u64 {
        if lambda < 30.0 {
            let limit = (-lambda).exp();
            let mut k: u64 = 0;
            let mut p = 1.0;
            loop {
                p *= self.rng.gen::<f64>();
                if p <= limit {
                    return k;
                }
                k += 1;
            }
        } else {
            let sample = self.gaussian(lambda, lambda.sqrt());
            sample.round().max(0.0) as u64
        }
    }

    /// Box-Muller Gaussian sample.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        // 1 - u keeps the argument of ln strictly positive
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = self.rng.gen::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Lexical heuristic shared by generator and documentation: true when the
/// username contains any suspicious substring.
pub fn is_suspicious_username(username: &str) -> bool {
    let lower = username.to_lowercase();
    SUSPICIOUS_SUBSTRINGS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = SyntheticDataGenerator::new(42)
            .with_reference_date(reference_date())
            .generate(500);
        let b = SyntheticDataGenerator::new(42)
            .with_reference_date(reference_date())
            .generate(500);
        assert_eq!(a, b);

        let c = SyntheticDataGenerator::new(43)
            .with_reference_date(reference_date())
            .generate(500);
        assert_ne!(a, c);
    }

    #[test]
    fn test_class_balance_near_thirty_percent() {
        let accounts = SyntheticDataGenerator::new(42)
            .with_reference_date(reference_date())
            .generate(10_000);

        let fake_count = accounts.iter().filter(|a| a.is_fake == 1).count();
        assert!(
            (2800..=3200).contains(&fake_count),
            "fake count {fake_count} outside tolerance"
        );
    }

    #[test]
    fn test_derived_flags_are_consistent() {
        let accounts = SyntheticDataGenerator::new(7)
            .with_reference_date(reference_date())
            .generate(2000);

        for account in &accounts {
            assert_eq!(
                account.suspicious_username == 1,
                is_suspicious_username(&account.username),
            );
            assert_eq!(
                account.low_activity == 1,
                account.posts_count < 5 && account.account_age_days > 30,
            );
            assert_eq!(
                account.high_follower_ratio == 1,
                account.followers_following_ratio > 10.0,
            );
            assert_eq!(
                account.low_engagement == 1,
                account.engagement_rate < 0.01 && account.followers > 100,
            );

            // Floored-denominator derivation
            let expected_ratio =
                account.followers as f64 / account.following.max(1) as f64;
            assert_eq!(account.followers_following_ratio, expected_ratio);

            // Engagement metrics are clipped at zero
            assert!(account.avg_likes >= 0.0);
            assert!(account.avg_comments >= 0.0);
            assert!(account.avg_shares >= 0.0);
        }
    }

    #[test]
    fn test_verified_fakes_do_not_exist() {
        let accounts = SyntheticDataGenerator::new(11)
            .with_reference_date(reference_date())
            .generate(2000);

        assert!(accounts
            .iter()
            .filter(|a| a.is_fake == 1)
            .all(|a| a.verified == 0));

        // Fake accounts are at most a year old
        assert!(accounts
            .iter()
            .filter(|a| a.is_fake == 1)
            .all(|a| a.account_age_days < 365));
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");

        let written = SyntheticDataGenerator::new(3)
            .with_reference_date(reference_date())
            .write_csv(50, &path)
            .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read: Vec<SyntheticAccount> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert_eq!(written, read);
    }

    #[test]
    fn test_suspicious_username_matching() {
        assert!(is_suspicious_username("bot1234"));
        assert!(is_suspicious_username("SPAM999"));
        assert!(is_suspicious_username("user4821"));
        assert!(!is_suspicious_username("alice_walker"));
    }
}
