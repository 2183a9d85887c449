use chrono::{DateTime, Utc};
use kachataka_core::{
    verify_result, verify_round, EngineError, EngineResult, Game, GameConfig, Outcome,
    RoundResult, SeedCommitment, ServerSeed, Verification,
};
use serde::{Deserialize, Serialize};

/// Settled bet as the application persists it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BetRecord {
    pub user_id: String,
    pub game: Game,
    pub round_id: String,
    pub bet_amount: f64,
    pub is_demo: bool,
    pub result: Outcome,
    pub win_amount: f64,
    pub multiplier: f64,
    /// Revealed seed; only safe to store once the round has resolved.
    pub server_seed: String,
    pub seed_hash: SeedCommitment,
    pub timestamp: DateTime<Utc>,
}

impl BetRecord {
    pub fn settle(
        user_id: impl Into<String>,
        round_id: impl Into<String>,
        is_demo: bool,
        bet_amount: f64,
        round: RoundResult,
        seed: &ServerSeed,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            game: round.game,
            round_id: round_id.into(),
            bet_amount,
            is_demo,
            result: round.outcome,
            win_amount: round.win_amount,
            multiplier: round.multiplier,
            server_seed: seed.as_str().to_string(),
            seed_hash: seed.commitment(),
            timestamp,
        }
    }

    /// Re-checks the commitment and re-derives the stored result.
    ///
    /// A record whose `game` disagrees with its result fails as an outcome mismatch.
    pub fn verify(&self, config: &GameConfig) -> EngineResult<Verification> {
        if self.game != self.result.game() {
            return Ok(Verification::OutcomeMismatch);
        }
        verify_round(
            &self.server_seed,
            self.seed_hash.as_str(),
            &self.round_id,
            config,
            &self.result,
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub server_seed: String,
    pub seed_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub verified: bool,
    pub message: String,
}

impl VerifyRequest {
    /// A malformed hash is a bad request; a well-formed one that does not
    /// match is a failed fairness check.
    pub fn check(&self) -> ApiResult<VerifyResponse> {
        let well_formed =
            self.seed_hash.len() == 64 && self.seed_hash.bytes().all(|b| b.is_ascii_hexdigit());
        if !well_formed {
            return Err(ApiError::Invalid(format!(
                "seed hash must be 64 hex characters, got {:?}",
                self.seed_hash
            )));
        }
        let verification = if verify_result(&self.server_seed, &self.seed_hash) {
            Verification::Verified
        } else {
            Verification::CommitmentMismatch
        };
        Ok(VerifyResponse::from(verification))
    }
}

impl From<Verification> for VerifyResponse {
    fn from(verification: Verification) -> Self {
        Self {
            verified: verification.is_verified(),
            message: verification.to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Invalid(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kachataka_core::{play_round, Wager};

    const SEED: &str = "3f1c9a7e5b2d4c8a0e6f1b3d5a7c9e2f4b6d8a0c1e3f5a7b9d2c4e6f8a1b3c5d";

    fn record() -> BetRecord {
        let seed = ServerSeed::from_hex(SEED).unwrap();
        let config = GameConfig::default();
        let wager = Wager::Mines {
            mine_count: 3,
            picks: vec![0, 1],
        };
        let round = play_round(seed.as_str(), "round-42", &config, &wager, 5.0).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        BetRecord::settle("user-1", "round-42", true, 5.0, round, &seed, ts)
    }

    #[test]
    fn record_uses_camel_case_shape() {
        let json = serde_json::to_value(record()).unwrap();
        for key in [
            "userId",
            "game",
            "roundId",
            "betAmount",
            "isDemo",
            "result",
            "winAmount",
            "multiplier",
            "serverSeed",
            "seedHash",
            "timestamp",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["game"], "mines");
        assert_eq!(json["result"]["mines"], serde_json::json!([4, 10, 13]));
        assert_eq!(
            json["seedHash"],
            "544e9e5315b0ee73576572abe830dfefa77257e859bf788e0cf2e70c51f09b5b"
        );
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn stored_record_verifies() {
        let rec = record();
        let json = serde_json::to_string(&rec).unwrap();
        let back: BetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.result, rec.result);
        assert_eq!(back.timestamp, rec.timestamp);
        assert_eq!(back.verify(&GameConfig::default()), Ok(Verification::Verified));
    }

    #[test]
    fn tampered_record_fails() {
        let mut rec = record();
        rec.result = Outcome::Mines {
            grid_size: 5,
            mines: [0, 1, 2].into_iter().collect(),
        };
        assert_eq!(
            rec.verify(&GameConfig::default()),
            Ok(Verification::OutcomeMismatch)
        );
    }

    #[test]
    fn relabelled_game_fails() {
        let mut rec = record();
        rec.game = Game::Dice;
        assert_eq!(
            rec.verify(&GameConfig::default()),
            Ok(Verification::OutcomeMismatch)
        );
    }

    #[test]
    fn verify_request_reports_distinctly() {
        let ok = VerifyRequest {
            server_seed: SEED.into(),
            seed_hash: "544e9e5315b0ee73576572abe830dfefa77257e859bf788e0cf2e70c51f09b5b".into(),
        }
        .check()
        .unwrap();
        assert!(ok.verified);

        let bad = VerifyRequest {
            server_seed: SEED.into(),
            seed_hash: "00".repeat(32),
        }
        .check()
        .unwrap();
        assert!(!bad.verified);
        assert!(bad.message.contains("fairness check failed"));

        let malformed = VerifyRequest {
            server_seed: SEED.into(),
            seed_hash: "not-a-hash".into(),
        }
        .check();
        assert!(matches!(malformed, Err(ApiError::Invalid(_))));
    }

    #[test]
    fn engine_errors_map_to_invalid() {
        let err: ApiError = EngineError::InvalidBet(-1.0).into();
        assert!(matches!(err, ApiError::Invalid(_)));
    }
}
