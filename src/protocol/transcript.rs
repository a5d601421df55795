//! Transcript — the Verifier's record of a proof run
//!
//! Holds every message it saw plus one record per round, and folds the
//! per-round verdicts into an overall outcome.

use super::{Challenge, Message, Payload, Response, Verdict};
use crate::graph::Graph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One completed round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    /// Root of the Prover's commitments, when commitments were used
    pub commitment_root: Option<String>,
    pub challenge: Challenge,
    pub response: Response,
    pub verdict: Verdict,
}

/// Verdict over all rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallVerdict {
    /// At least one round accepted and none rejected
    Accepted,
    /// Some round rejected
    Rejected,
    /// Every round was void
    Inconclusive,
}

/// Round tallies and the overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOutcome {
    pub accepted: u32,
    pub rejected: u32,
    pub inconclusive: u32,
    pub verdict: OverallVerdict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub session_id: String,
    pub vertices: usize,
    pub edges: usize,
    pub colors: u8,
    pub rounds: Vec<RoundRecord>,
    pub messages: Vec<Message>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Transcript {
    pub fn new(graph: &Graph, colors: u8) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            colors,
            rounds: Vec::new(),
            messages: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn record_round(&mut self, record: RoundRecord) {
        self.rounds.push(record);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn outcome(&self) -> ProofOutcome {
        let count = |f: fn(&Verdict) -> bool| self.rounds.iter().filter(|r| f(&r.verdict)).count() as u32;
        let accepted = count(Verdict::is_accept);
        let rejected = count(Verdict::is_reject);
        let inconclusive = count(Verdict::is_inconclusive);
        let verdict = if rejected > 0 {
            OverallVerdict::Rejected
        } else if accepted > 0 {
            OverallVerdict::Accepted
        } else {
            OverallVerdict::Inconclusive
        };
        ProofOutcome {
            accepted,
            rejected,
            inconclusive,
            verdict,
        }
    }

    /// Upper bound on the chance that a Prover without a proper coloring
    /// survives every accepted round: `(1 - 1/|E|)^accepted`
    pub fn soundness_error(&self) -> f64 {
        if self.edges == 0 {
            return 1.0;
        }
        let per_round = 1.0 - 1.0 / self.edges as f64;
        per_round.powi(self.outcome().accepted as i32)
    }

    /// Per round: optional commitment, then exactly one challenge followed
    /// by exactly one response
    pub fn is_well_ordered(&self) -> bool {
        let mut per_round: BTreeMap<u32, Vec<&'static str>> = BTreeMap::new();
        for message in &self.messages {
            per_round
                .entry(message.payload.round())
                .or_default()
                .push(message.payload.kind());
        }
        per_round.values().all(|kinds| {
            matches!(
                kinds.as_slice(),
                ["challenge", "response"] | ["commitment", "challenge", "response"]
            )
        })
    }

    /// Console lines in message order, each verdict after its response
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for message in &self.messages {
            lines.push(message.render());
            if let Payload::Response(response) = &message.payload {
                if let Some(record) = self.rounds.iter().find(|r| r.round == response.round()) {
                    lines.push(format!("Verifier: {}", record.verdict.describe()));
                }
            }
        }
        lines
    }

    pub fn summary(&self) -> String {
        let outcome = self.outcome();
        format!(
            "Transcript {} | {} rounds | accepted={} rejected={} inconclusive={} | verdict={:?} | soundness error ≤ {:.4}",
            self.session_id.get(..8).unwrap_or(&self.session_id),
            self.rounds.len(),
            outcome.accepted,
            outcome.rejected,
            outcome.inconclusive,
            outcome.verdict,
            self.soundness_error()
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Role;

    fn record(round: u32, verdict: Verdict) -> RoundRecord {
        RoundRecord {
            round,
            commitment_root: None,
            challenge: Challenge::new(round, 0, 1),
            response: Response::NotAnEdge { round, u: 0, v: 1 },
            verdict,
        }
    }

    fn transcript() -> Transcript {
        Transcript::new(&Graph::complete(4), 3)
    }

    #[test]
    fn test_outcome_folding() {
        let mut t = transcript();
        assert_eq!(t.outcome().verdict, OverallVerdict::Inconclusive);

        t.record_round(record(0, Verdict::Inconclusive));
        assert_eq!(t.outcome().verdict, OverallVerdict::Inconclusive);

        t.record_round(record(1, Verdict::Accept));
        t.record_round(record(2, Verdict::Accept));
        let outcome = t.outcome();
        assert_eq!(outcome.verdict, OverallVerdict::Accepted);
        assert_eq!((outcome.accepted, outcome.rejected, outcome.inconclusive), (2, 0, 1));

        t.record_round(record(3, Verdict::Reject("equal colors".into())));
        assert_eq!(t.outcome().verdict, OverallVerdict::Rejected);
    }

    #[test]
    fn test_soundness_error_shrinks_with_accepted_rounds() {
        let mut t = transcript();
        assert_eq!(t.soundness_error(), 1.0);
        t.record_round(record(0, Verdict::Accept));
        let one = t.soundness_error();
        assert!((one - 5.0 / 6.0).abs() < 1e-12);
        t.record_round(record(1, Verdict::Accept));
        assert!(t.soundness_error() < one);
    }

    #[test]
    fn test_well_ordered() {
        let mut t = transcript();
        t.record_message(Message::new(Role::Verifier, Payload::Challenge(Challenge::new(0, 0, 1))));
        t.record_message(Message::new(
            Role::Prover,
            Payload::Response(Response::NotAnEdge { round: 0, u: 0, v: 1 }),
        ));
        assert!(t.is_well_ordered());

        // A second response in the same round breaks the invariant
        t.record_message(Message::new(
            Role::Prover,
            Payload::Response(Response::NotAnEdge { round: 0, u: 0, v: 1 }),
        ));
        assert!(!t.is_well_ordered());
    }

    #[test]
    fn test_response_before_challenge_is_not_well_ordered() {
        let mut t = transcript();
        t.record_message(Message::new(
            Role::Prover,
            Payload::Response(Response::NotAnEdge { round: 0, u: 0, v: 1 }),
        ));
        t.record_message(Message::new(Role::Verifier, Payload::Challenge(Challenge::new(0, 0, 1))));
        assert!(!t.is_well_ordered());
    }

    #[test]
    fn test_summary_with_short_or_multibyte_id() {
        let mut t = transcript();
        t.session_id = "abc".to_string();
        assert!(t.summary().starts_with("Transcript abc |"));
        t.session_id = "ééééé".to_string();
        assert!(t.summary().starts_with("Transcript ééééé |"));
    }

    #[test]
    fn test_render_and_json() {
        let mut t = transcript();
        t.record_message(Message::new(Role::Verifier, Payload::Challenge(Challenge::new(0, 0, 1))));
        t.record_message(Message::new(
            Role::Prover,
            Payload::Response(Response::Revealed { round: 0, u: 0, v: 1, colors: [3, 1], openings: None }),
        ));
        t.record_round(record(0, Verdict::Accept));
        t.finish();

        let lines = t.render_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Verifier to Prover"));
        assert!(lines[1].contains("(V: 1 --> C: 3)"));
        assert!(lines[2].starts_with("Verifier: OK."));

        let json = t.to_json().unwrap();
        let back: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rounds.len(), 1);
        assert!(back.finished_at.is_some());
        assert!(t.summary().contains("verdict=Accepted"));
    }
}
