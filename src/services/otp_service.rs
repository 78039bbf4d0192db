// services/otp_service.rs
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::models::otp::OneTimeCode;

/// Why a submitted code was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpRejection {
    NotFound,
    Expired,
    TooManyAttempts,
    InvalidCode,
}

impl OtpRejection {
    pub fn message(&self) -> &'static str {
        match self {
            OtpRejection::NotFound => "OTP not found or expired",
            OtpRejection::Expired => "OTP expired",
            OtpRejection::TooManyAttempts => "Too many attempts. Request a new OTP",
            OtpRejection::InvalidCode => "Invalid OTP",
        }
    }
}

/// Backing store for pending one-time codes, keyed by normalized email.
///
/// The engine needs get, put, and compare-guarded update/delete; the
/// medium behind it (in-process table here, a row store in a bigger
/// deployment) is swappable without touching the validation logic.
///
/// The compare-guarded operations take the record the caller read and
/// apply only if the stored record is still identical. That is what
/// keeps a read-modify-write validate from losing an increment to a
/// concurrent validate, or from resurrecting a code that a concurrent
/// re-issue already replaced.
#[async_trait]
pub trait OtpStore: Send + Sync {
    async fn get(&self, email: &str) -> Result<Option<OneTimeCode>>;
    async fn put(&self, email: &str, record: OneTimeCode) -> Result<()>;
    /// Replace the record only if it still equals `expected`.
    async fn update_if(
        &self,
        email: &str,
        expected: &OneTimeCode,
        record: OneTimeCode,
    ) -> Result<bool>;
    /// Remove the record only if it still equals `expected`.
    async fn delete_if(&self, email: &str, expected: &OneTimeCode) -> Result<bool>;
}

/// In-process table, the same shape the server ran with in production.
/// The single mutex serializes concurrent issue/validate calls so a
/// re-issue racing an attempt increment cannot lose an update.
#[derive(Clone, Default)]
pub struct MemoryOtpStore {
    codes: Arc<Mutex<HashMap<String, OneTimeCode>>>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn get(&self, email: &str) -> Result<Option<OneTimeCode>> {
        Ok(self.codes.lock().await.get(email).cloned())
    }

    async fn put(&self, email: &str, record: OneTimeCode) -> Result<()> {
        self.codes.lock().await.insert(email.to_string(), record);
        Ok(())
    }

    async fn update_if(
        &self,
        email: &str,
        expected: &OneTimeCode,
        record: OneTimeCode,
    ) -> Result<bool> {
        let mut codes = self.codes.lock().await;
        match codes.get(email) {
            Some(current) if current == expected => {
                codes.insert(email.to_string(), record);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if(&self, email: &str, expected: &OneTimeCode) -> Result<bool> {
        let mut codes = self.codes.lock().await;
        match codes.get(email) {
            Some(current) if current == expected => {
                codes.remove(email);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Clone)]
pub struct OtpService {
    store: Arc<dyn OtpStore>,
    ttl: Duration,
    max_attempts: u32,
}

impl OtpService {
    pub fn new(store: Arc<dyn OtpStore>, ttl_minutes: i64, max_attempts: u32) -> Self {
        Self {
            store,
            ttl: Duration::minutes(ttl_minutes),
            max_attempts,
        }
    }

    /// Generate a 6-digit OTP. Stays in 100000..=999999, so leading-zero
    /// sequences never occur; that is a fixed design choice carried over
    /// from the original service.
    pub fn generate() -> String {
        let mut rng = rand::thread_rng();
        rng.gen_range(100_000..=999_999).to_string()
    }

    /// Store a fresh code for `email`, replacing any earlier unconsumed
    /// one. There is never more than one live code per identity.
    pub async fn issue(&self, email: &str, code: &str) -> Result<()> {
        let now = Utc::now();
        let record = OneTimeCode {
            code: code.to_string(),
            attempts: 0,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        self.store.put(email, record).await?;
        tracing::debug!("Stored OTP valid {} minutes", self.ttl.num_minutes());
        Ok(())
    }

    /// Check a submitted code. Success consumes the record; so do the
    /// expired and exhausted rejections. Only a wrong guess with budget
    /// left keeps the record alive, with its attempt counter bumped.
    ///
    /// Every transition is compare-guarded against the record that was
    /// read, so two validates racing on one identity cannot lose an
    /// attempt increment and both cannot consume the same code; a lost
    /// race re-reads and replays against the fresh state.
    pub async fn validate(&self, email: &str, submitted: &str) -> Result<std::result::Result<(), OtpRejection>> {
        loop {
            let Some(record) = self.store.get(email).await? else {
                return Ok(Err(OtpRejection::NotFound));
            };

            if Utc::now() > record.expires_at {
                if self.store.delete_if(email, &record).await? {
                    return Ok(Err(OtpRejection::Expired));
                }
                continue;
            }

            if record.attempts >= self.max_attempts {
                if self.store.delete_if(email, &record).await? {
                    return Ok(Err(OtpRejection::TooManyAttempts));
                }
                continue;
            }

            if record.code == submitted {
                if self.store.delete_if(email, &record).await? {
                    return Ok(Ok(()));
                }
                continue;
            }

            let mut bumped = record.clone();
            bumped.attempts += 1;
            if self.store.update_if(email, &record, bumped).await? {
                return Ok(Err(OtpRejection::InvalidCode));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_store() -> (OtpService, MemoryOtpStore) {
        let store = MemoryOtpStore::new();
        let service = OtpService::new(Arc::new(store.clone()), 10, 3);
        (service, store)
    }

    #[test]
    fn generate_is_six_ascii_digits_in_range() {
        for _ in 0..1000 {
            let code = OtpService::generate();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn generate_covers_the_range() {
        // Over many samples both halves of the range should show up.
        let mut low = 0;
        let mut high = 0;
        for _ in 0..2000 {
            let n: u32 = OtpService::generate().parse().unwrap();
            if n < 550_000 {
                low += 1;
            } else {
                high += 1;
            }
        }
        assert!(low > 500, "low half underrepresented: {}", low);
        assert!(high > 500, "high half underrepresented: {}", high);
    }

    #[tokio::test]
    async fn validate_succeeds_exactly_once() {
        let (service, _) = service_with_store();
        service.issue("a@b.com", "482913").await.unwrap();

        assert_eq!(service.validate("a@b.com", "482913").await.unwrap(), Ok(()));
        // Consumed; a second try with the same code finds nothing.
        assert_eq!(
            service.validate("a@b.com", "482913").await.unwrap(),
            Err(OtpRejection::NotFound)
        );
    }

    #[tokio::test]
    async fn reissue_replaces_previous_code() {
        let (service, _) = service_with_store();
        service.issue("a@b.com", "111111").await.unwrap();
        service.issue("a@b.com", "222222").await.unwrap();

        assert_eq!(
            service.validate("a@b.com", "111111").await.unwrap(),
            Err(OtpRejection::InvalidCode)
        );
        assert_eq!(service.validate("a@b.com", "222222").await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn attempts_exhaust_even_with_correct_code() {
        let (service, _) = service_with_store();
        service.issue("x@y.com", "100000").await.unwrap();

        for _ in 0..3 {
            assert_eq!(
                service.validate("x@y.com", "999999").await.unwrap(),
                Err(OtpRejection::InvalidCode)
            );
        }
        // Fourth try, right code: budget is gone and the record with it.
        assert_eq!(
            service.validate("x@y.com", "100000").await.unwrap(),
            Err(OtpRejection::TooManyAttempts)
        );
        assert_eq!(
            service.validate("x@y.com", "100000").await.unwrap(),
            Err(OtpRejection::NotFound)
        );
    }

    #[tokio::test]
    async fn expired_code_is_rejected_and_purged() {
        let (service, store) = service_with_store();
        let now = Utc::now();
        store
            .put(
                "a@b.com",
                OneTimeCode {
                    code: "482913".to_string(),
                    attempts: 0,
                    issued_at: now - Duration::minutes(11),
                    expires_at: now - Duration::minutes(1),
                },
            )
            .await
            .unwrap();

        assert_eq!(
            service.validate("a@b.com", "482913").await.unwrap(),
            Err(OtpRejection::Expired)
        );
        assert!(store.get("a@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_numeric_submission_is_just_an_invalid_code() {
        let (service, _) = service_with_store();
        service.issue("a@b.com", "482913").await.unwrap();
        assert_eq!(
            service.validate("a@b.com", "not-a-code").await.unwrap(),
            Err(OtpRejection::InvalidCode)
        );
        // Record survives the bad guess.
        assert_eq!(service.validate("a@b.com", "482913").await.unwrap(), Ok(()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_wrong_guesses_all_count() {
        let store = MemoryOtpStore::new();
        // Attempt budget large enough that no guess hits the cap.
        let service = OtpService::new(Arc::new(store.clone()), 10, 100);
        service.issue("a@b.com", "482913").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.validate("a@b.com", "000000").await.unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Err(OtpRejection::InvalidCode));
        }

        let record = store.get("a@b.com").await.unwrap().unwrap();
        assert_eq!(record.attempts, 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_correct_guesses_succeed_exactly_once() {
        let (service, _) = service_with_store();
        service.issue("a@b.com", "482913").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.validate("a@b.com", "482913").await.unwrap()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(rejection) => assert_eq!(rejection, OtpRejection::NotFound),
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn stale_update_does_not_resurrect_a_replaced_code() {
        let (service, store) = service_with_store();
        service.issue("a@b.com", "111111").await.unwrap();
        let stale = store.get("a@b.com").await.unwrap().unwrap();

        // Re-issue lands between a validate's read and its write-back.
        service.issue("a@b.com", "222222").await.unwrap();

        let mut bumped = stale.clone();
        bumped.attempts += 1;
        assert!(!store.update_if("a@b.com", &stale, bumped).await.unwrap());
        assert!(!store.delete_if("a@b.com", &stale).await.unwrap());

        // The replacement code is untouched and still valid.
        assert_eq!(service.validate("a@b.com", "222222").await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn identities_are_independent() {
        let (service, _) = service_with_store();
        service.issue("a@b.com", "111111").await.unwrap();
        service.issue("c@d.com", "222222").await.unwrap();

        assert_eq!(service.validate("a@b.com", "111111").await.unwrap(), Ok(()));
        assert_eq!(service.validate("c@d.com", "222222").await.unwrap(), Ok(()));
    }
}
