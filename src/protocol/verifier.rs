//! Verifier side of a round: Init → ChallengeSent → AwaitingResponse →
//! Verified(verdict) → Done

use super::{Challenge, ProtocolError, Response, Role};
use crate::config::{ChallengeSampling, ProtocolConfig};
use crate::graph::{Color, Graph};
use crate::zk::{CommitmentSet, Opening};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Outcome of a single round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Revealed endpoint colors differ, consistent with a proper coloring
    Accept,
    /// The response contradicts the claim
    Reject(String),
    /// The challenged pair is not an edge; the round carries no evidence
    Inconclusive,
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, Verdict::Reject(_))
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Verdict::Inconclusive)
    }

    pub fn describe(&self) -> String {
        match self {
            Verdict::Accept => "OK. I am one step closer to being convinced that, indeed, this graph is three-colorable...".to_string(),
            Verdict::Reject(reason) => format!("Nope, you're not going to deceive me! ({})", reason),
            Verdict::Inconclusive => "Not an edge, nothing learned this round.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierState {
    Init,
    ChallengeSent,
    AwaitingResponse,
    Verified(Verdict),
    Done,
}

impl fmt::Display for VerifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifierState::Verified(_) => f.write_str("Verified"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

pub struct VerifierSession {
    graph: Arc<Graph>,
    colors: u8,
    sampling: ChallengeSampling,
    require_commitments: bool,
    rng: StdRng,
    state: VerifierState,
    round: u32,
    commitments: Option<CommitmentSet>,
    pending: Option<Challenge>,
}

impl VerifierSession {
    pub fn new(
        graph: Arc<Graph>,
        colors: u8,
        sampling: ChallengeSampling,
        require_commitments: bool,
        rng: StdRng,
    ) -> Self {
        Self {
            graph,
            colors,
            sampling,
            require_commitments,
            rng,
            state: VerifierState::Init,
            round: 0,
            commitments: None,
            pending: None,
        }
    }

    pub fn from_config(graph: Arc<Graph>, config: &ProtocolConfig) -> Self {
        let rng = super::seeded_rng(config.seed, Role::Verifier);
        Self::new(graph, config.colors, config.sampling, config.commitments, rng)
    }

    pub fn state(&self) -> &VerifierState {
        &self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn requires_commitments(&self) -> bool {
        self.require_commitments
    }

    /// Reset for `round`; allowed before the first round or after `finish_round`
    pub fn start_round(&mut self, round: u32) -> Result<(), ProtocolError> {
        if !matches!(self.state, VerifierState::Init | VerifierState::Done) {
            return Err(self.state_error("start a round"));
        }
        self.round = round;
        self.commitments = None;
        self.pending = None;
        self.state = VerifierState::Init;
        Ok(())
    }

    /// Store the Prover's commitments for this round
    pub fn receive_commitments(&mut self, set: CommitmentSet) -> Result<(), ProtocolError> {
        if self.state != VerifierState::Init || self.commitments.is_some() {
            return Err(self.state_error("receive commitments"));
        }
        debug!("Round {}: received commitment root {}", self.round, set.root_commitment);
        self.commitments = Some(set);
        Ok(())
    }

    /// Draw and record this round's challenge
    pub fn issue_challenge(&mut self) -> Result<Challenge, ProtocolError> {
        if self.state != VerifierState::Init {
            return Err(self.state_error("issue a challenge"));
        }
        if self.require_commitments && self.commitments.is_none() {
            return Err(self.state_error("challenge before commitments"));
        }
        let (u, v) = self.sample_pair()?;
        let challenge = Challenge::new(self.round, u, v);
        self.pending = Some(challenge);
        self.state = VerifierState::ChallengeSent;
        Ok(challenge)
    }

    /// Mark the session as blocked on the Prover's answer
    pub fn await_response(&mut self) -> Result<(), ProtocolError> {
        if self.state != VerifierState::ChallengeSent {
            return Err(self.state_error("await a response"));
        }
        self.state = VerifierState::AwaitingResponse;
        Ok(())
    }

    /// Judge the Prover's answer to the pending challenge
    pub fn check_response(&mut self, response: &Response) -> Result<Verdict, ProtocolError> {
        if !matches!(
            self.state,
            VerifierState::ChallengeSent | VerifierState::AwaitingResponse
        ) {
            return Err(self.state_error("check a response"));
        }
        let challenge = self.pending.ok_or_else(|| self.state_error("check a response"))?;

        let verdict = self.evaluate(&challenge, response);
        info!("Round {}: {:?}", self.round, verdict);
        self.state = VerifierState::Verified(verdict.clone());
        Ok(verdict)
    }

    /// Close the round and hand back its verdict
    pub fn finish_round(&mut self) -> Result<Verdict, ProtocolError> {
        let VerifierState::Verified(verdict) = &self.state else {
            return Err(self.state_error("finish a round"));
        };
        let verdict = verdict.clone();
        self.commitments = None;
        self.pending = None;
        self.state = VerifierState::Done;
        Ok(verdict)
    }

    fn sample_pair(&mut self) -> Result<(usize, usize), ProtocolError> {
        let n = self.graph.vertex_count();
        match self.sampling {
            ChallengeSampling::AnyPair => {
                if n == 0 {
                    return Err(ProtocolError::NoChallengeAvailable);
                }
                Ok((self.rng.gen_range(0..n), self.rng.gen_range(0..n)))
            }
            ChallengeSampling::EdgesOnly => {
                let edges = self.graph.edges();
                if edges.is_empty() {
                    return Err(ProtocolError::NoChallengeAvailable);
                }
                let (u, v) = edges[self.rng.gen_range(0..edges.len())];
                Ok(if self.rng.gen_bool(0.5) { (u, v) } else { (v, u) })
            }
        }
    }

    fn evaluate(&self, challenge: &Challenge, response: &Response) -> Verdict {
        if response.round() != challenge.round || response.pair() != challenge.pair() {
            let (ru, rv) = response.pair();
            return Verdict::Reject(format!(
                "response answers ({}, {}) in round {}, challenge was ({}, {}) in round {}",
                ru, rv, response.round(), challenge.u, challenge.v, challenge.round
            ));
        }
        let (u, v) = challenge.pair();
        let is_edge = self.graph.has_edge(u, v);

        match response {
            Response::Failed { error, .. } => Verdict::Reject(format!("prover failed: {}", error)),
            Response::NotAnEdge { .. } if is_edge => {
                Verdict::Reject(format!("prover declined the real edge ({}, {})", u, v))
            }
            Response::NotAnEdge { .. } => Verdict::Inconclusive,
            Response::Revealed { .. } if !is_edge => {
                Verdict::Reject(format!("colors revealed for non-edge ({}, {})", u, v))
            }
            Response::Revealed { colors, openings, .. } => {
                if let Some(reason) = self.check_openings(u, v, colors, openings.as_ref()) {
                    return Verdict::Reject(reason);
                }
                if let Some(&c) = colors.iter().find(|&&c| c == 0 || c > self.colors) {
                    return Verdict::Reject(format!("color {} outside 1..={}", c, self.colors));
                }
                if colors[0] == colors[1] {
                    return Verdict::Reject(format!("both endpoints have color {}", colors[0]));
                }
                Verdict::Accept
            }
        }
    }

    /// `Some(reason)` when the reveal does not match the round's commitments
    fn check_openings(
        &self,
        u: usize,
        v: usize,
        colors: &[Color; 2],
        openings: Option<&[Opening; 2]>,
    ) -> Option<String> {
        if !self.require_commitments {
            return None;
        }
        let Some(set) = &self.commitments else {
            return Some("no commitments received".to_string());
        };
        if set.round != self.round || set.len() != self.graph.vertex_count() || !set.verify_root() {
            return Some("commitment set is malformed".to_string());
        }
        let Some([a, b]) = openings else {
            return Some("reveal carries no openings".to_string());
        };
        let matches_reveal =
            a.vertex == u && b.vertex == v && a.color == colors[0] && b.color == colors[1];
        if !matches_reveal || !set.verify_opening(a) || !set.verify_opening(b) {
            return Some("opening does not match commitment".to_string());
        }
        None
    }

    fn state_error(&self, action: &'static str) -> ProtocolError {
        ProtocolError::UnexpectedState {
            role: Role::Verifier,
            action,
            state: self.state.to_string(),
        }
    }
}
