//! Prover side of a round: Init → AwaitingChallenge → ComputingResponse →
//! ResponseSent → Done
//!
//! The base coloring never leaves this struct. Each round relabels it with a
//! fresh permutation, commits to the result, and forgets it once the response
//! is out.

use super::{Challenge, ProtocolError, Response, ResponseError, Role};
use crate::config::ProtocolConfig;
use crate::graph::{Coloring, ColoringSolver, Graph};
use crate::zk::{CommitmentSet, CommittedWitness, Permutation, Witness};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProverState {
    Init,
    AwaitingChallenge,
    ComputingResponse,
    ResponseSent,
    Done,
}

impl fmt::Display for ProverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub struct ProverSession {
    graph: Arc<Graph>,
    coloring: Coloring,
    commit: bool,
    rng: StdRng,
    state: ProverState,
    round: u32,
    current: Option<CommittedWitness>,
}

impl ProverSession {
    /// Prover holding an explicit coloring; properness is not enforced
    pub fn new(graph: Arc<Graph>, coloring: Coloring, commit: bool, rng: StdRng) -> Self {
        if !coloring.is_proper(&graph) {
            warn!("Prover coloring is not proper for this graph");
        }
        Self {
            graph,
            coloring,
            commit,
            rng,
            state: ProverState::Init,
            round: 0,
            current: None,
        }
    }

    pub fn from_config(graph: Arc<Graph>, coloring: Coloring, config: &ProtocolConfig) -> Self {
        let rng = super::seeded_rng(config.seed, Role::Prover);
        Self::new(graph, coloring, config.commitments, rng)
    }

    /// Run the solver for `config.colors` and build a Prover from its result
    pub fn solve(graph: Arc<Graph>, config: &ProtocolConfig) -> Result<Self, ProtocolError> {
        let coloring = ColoringSolver::new(config.colors).solve(&graph)?;
        info!("Prover found a proper {}-coloring of {}", config.colors, graph.summary());
        Ok(Self::from_config(graph, coloring, config))
    }

    pub fn state(&self) -> ProverState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whether each round publishes commitments and opens against them
    pub fn commits(&self) -> bool {
        self.commit
    }

    /// The unpermuted coloring (the secret witness)
    pub fn coloring(&self) -> &Coloring {
        &self.coloring
    }

    /// Fresh permutation, witness and commitments for `round`
    ///
    /// Returns the commitment set to publish when commitments are enabled.
    pub fn begin_round(&mut self, round: u32) -> Result<Option<CommitmentSet>, ProtocolError> {
        self.expect(&[ProverState::Init, ProverState::Done], "begin a round")?;

        let permutation = Permutation::random(self.coloring.k(), &mut self.rng);
        let witness = Witness::new(&self.coloring, &permutation)?;
        let committed = CommittedWitness::commit(witness, round, &mut self.rng);
        debug!(
            "Round {}: committed witness root {}",
            round,
            committed.commitments().root_commitment
        );
        let published = self.commit.then(|| committed.commitments().clone());

        self.round = round;
        self.current = Some(committed);
        self.state = ProverState::AwaitingChallenge;
        Ok(published)
    }

    /// Answer a challenge against the current round's witness
    pub fn respond(&mut self, challenge: &Challenge) -> Result<Response, ProtocolError> {
        self.expect(&[ProverState::AwaitingChallenge], "respond")?;
        self.state = ProverState::ComputingResponse;

        let response = self.compute_response(challenge)?;
        if let Some(error) = response.error() {
            warn!("Round {}: answering with error: {}", challenge.round, error);
        }

        self.state = ProverState::ResponseSent;
        Ok(response)
    }

    /// Discard the round's witness
    pub fn finish_round(&mut self) -> Result<(), ProtocolError> {
        self.expect(&[ProverState::ResponseSent], "finish a round")?;
        self.current = None;
        self.state = ProverState::Done;
        Ok(())
    }

    fn compute_response(&self, challenge: &Challenge) -> Result<Response, ProtocolError> {
        let Challenge { round, u, v } = *challenge;
        let n = self.graph.vertex_count();

        if !self.graph.contains_vertex(u) || !self.graph.contains_vertex(v) {
            return Ok(Response::Failed {
                round,
                u,
                v,
                error: ResponseError::MalformedChallenge { u, v, n },
            });
        }
        if !self.graph.has_edge(u, v) {
            return Ok(Response::NotAnEdge { round, u, v });
        }

        let committed = self.current.as_ref().ok_or_else(|| self.state_error("respond"))?;
        let (open_u, open_v) = match (committed.open(u), committed.open(v)) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => return Ok(Self::inconsistent(round, u, v, u)),
            (_, None) => return Ok(Self::inconsistent(round, u, v, v)),
        };

        Ok(Response::Revealed {
            round,
            u,
            v,
            colors: [open_u.color, open_v.color],
            openings: self.commit.then_some([open_u, open_v]),
        })
    }

    fn inconsistent(round: u32, u: usize, v: usize, vertex: usize) -> Response {
        Response::Failed {
            round,
            u,
            v,
            error: ResponseError::InternalInconsistency { vertex },
        }
    }

    fn expect(&self, allowed: &[ProverState], action: &'static str) -> Result<(), ProtocolError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.state_error(action))
        }
    }

    fn state_error(&self, action: &'static str) -> ProtocolError {
        ProtocolError::UnexpectedState {
            role: Role::Prover,
            action,
            state: self.state.to_string(),
        }
    }
}
