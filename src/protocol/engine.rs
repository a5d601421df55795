//! ProtocolEngine — runs Prover and Verifier as two concurrent tasks
//!
//! The tasks share nothing but the read-only graph and two bounded
//! channels (Verifier → Prover for challenges, Prover → Verifier for
//! commitments and responses). Each side blocks only on `recv`. Dropping a
//! sender on failure closes the channel, so the counterpart never waits
//! forever.

use super::{
    Message, Payload, ProtocolError, ProverSession, Role, RoundRecord, Transcript, VerifierSession,
};
use crate::config::{ConfigError, ProtocolConfig};
use crate::graph::{Coloring, Graph};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct ProtocolEngine {
    graph: Arc<Graph>,
    config: ProtocolConfig,
}

impl ProtocolEngine {
    pub fn new(graph: Arc<Graph>, config: ProtocolConfig) -> Result<Self, ProtocolError> {
        config.validate()?;
        Ok(Self { graph, config })
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Solve for a witness, then run every configured round
    ///
    /// Fails with [`ProtocolError::Coloring`] before any round starts when the
    /// graph has no proper coloring with `config.colors` colors.
    pub async fn prove(&self) -> Result<Transcript, ProtocolError> {
        let prover = ProverSession::solve(self.graph.clone(), &self.config)?;
        let verifier = VerifierSession::from_config(self.graph.clone(), &self.config);
        self.run_sessions(prover, verifier).await
    }

    /// Run every configured round with a Prover holding `coloring`
    pub async fn run(&self, coloring: Coloring) -> Result<Transcript, ProtocolError> {
        let prover = ProverSession::from_config(self.graph.clone(), coloring, &self.config);
        let verifier = VerifierSession::from_config(self.graph.clone(), &self.config);
        self.run_sessions(prover, verifier).await
    }

    /// Spawn both actors and wait for both to finish
    pub async fn run_sessions(
        &self,
        prover: ProverSession,
        verifier: VerifierSession,
    ) -> Result<Transcript, ProtocolError> {
        // Each side would otherwise wait on the other's first message
        if prover.commits() != verifier.requires_commitments() {
            return Err(ConfigError::Invalid(format!(
                "prover commitments={} but verifier requires_commitments={}",
                prover.commits(),
                verifier.requires_commitments()
            ))
            .into());
        }

        let capacity = self.config.channel_capacity;
        let rounds = self.config.rounds;
        let (ptv_tx, ptv_rx) = mpsc::channel::<Message>(capacity);
        let (vtp_tx, vtp_rx) = mpsc::channel::<Message>(capacity);
        let transcript = Transcript::new(&self.graph, self.config.colors);

        info!("Starting proof: {} | {}", self.graph.summary(), self.config.summary());

        let verifier_task = tokio::spawn(run_verifier(verifier, transcript, rounds, vtp_tx, ptv_rx));
        let prover_task = tokio::spawn(run_prover(prover, rounds, ptv_tx, vtp_rx));

        let (verifier_result, prover_result) = tokio::join!(verifier_task, prover_task);
        let verifier_result =
            verifier_result.map_err(|e| ProtocolError::TaskFailed(format!("verifier: {}", e)))?;
        let prover_result =
            prover_result.map_err(|e| ProtocolError::TaskFailed(format!("prover: {}", e)))?;

        match (verifier_result, prover_result) {
            (Ok(transcript), Ok(())) => {
                info!("{}", transcript.summary());
                Ok(transcript)
            }
            // The side that failed first is the interesting one; the other
            // usually just saw its channel close
            (Err(ProtocolError::ChannelClosed(_)), Err(e)) | (Err(e), _) | (Ok(_), Err(e)) => {
                warn!("Proof aborted: {}", e);
                Err(e)
            }
        }
    }
}

async fn run_prover(
    mut session: ProverSession,
    rounds: u32,
    tx: mpsc::Sender<Message>,
    mut rx: mpsc::Receiver<Message>,
) -> Result<(), ProtocolError> {
    for round in 0..rounds {
        if let Some(commitments) = session.begin_round(round)? {
            send(&tx, Message::new(Role::Prover, Payload::Commitment(commitments))).await?;
        }

        let message = recv(&mut rx, Role::Verifier).await?;
        let challenge = match message.payload {
            Payload::Challenge(challenge) => challenge,
            other => return Err(unexpected(Role::Prover, "challenge", &other)),
        };
        debug!("Prover received: {}", message.note);

        let response = session.respond(&challenge)?;
        send(&tx, Message::new(Role::Prover, Payload::Response(response))).await?;
        session.finish_round()?;
    }
    debug!("Prover finished {} rounds", rounds);
    Ok(())
}

async fn run_verifier(
    mut session: VerifierSession,
    mut transcript: Transcript,
    rounds: u32,
    tx: mpsc::Sender<Message>,
    mut rx: mpsc::Receiver<Message>,
) -> Result<Transcript, ProtocolError> {
    for round in 0..rounds {
        session.start_round(round)?;

        let mut commitment_root = None;
        if session.requires_commitments() {
            let message = recv(&mut rx, Role::Prover).await?;
            transcript.record_message(message.clone());
            match message.payload {
                Payload::Commitment(set) => {
                    commitment_root = Some(set.root_commitment.clone());
                    session.receive_commitments(set)?;
                }
                other => return Err(unexpected(Role::Verifier, "commitment", &other)),
            }
        }

        let challenge = session.issue_challenge()?;
        let message = Message::new(Role::Verifier, Payload::Challenge(challenge));
        info!("Round {}: {}", round, message.render());
        transcript.record_message(message.clone());
        send(&tx, message).await?;

        session.await_response()?;
        let message = recv(&mut rx, Role::Prover).await?;
        info!("Round {}: {}", round, message.render());
        transcript.record_message(message.clone());
        let response = match message.payload {
            Payload::Response(response) => response,
            other => return Err(unexpected(Role::Verifier, "response", &other)),
        };

        session.check_response(&response)?;
        let verdict = session.finish_round()?;
        transcript.record_round(RoundRecord {
            round,
            commitment_root,
            challenge,
            response,
            verdict,
        });
    }
    transcript.finish();
    Ok(transcript)
}

async fn send(tx: &mpsc::Sender<Message>, message: Message) -> Result<(), ProtocolError> {
    let to = message.recipient;
    tx.send(message)
        .await
        .map_err(|_| ProtocolError::ChannelClosed(to))
}

async fn recv(rx: &mut mpsc::Receiver<Message>, from: Role) -> Result<Message, ProtocolError> {
    rx.recv().await.ok_or(ProtocolError::ChannelClosed(from))
}

fn unexpected(role: Role, expected: &'static str, received: &Payload) -> ProtocolError {
    ProtocolError::UnexpectedPayload {
        role,
        expected,
        received: received.kind(),
    }
}
