//! Conversation buffer.
//!
//! Ordered messages sent to the backend each turn. Index 0 is always the system message composed
//! from the current personas and key events; index 1 may hold a "has been summarized" marker right
//! after a compaction. Every other message is a user or assistant turn.
//!
//! The buffer is only readable from outside (`messages()` hands out a slice); all mutation goes
//! through `append`, `finish_turn`, `trim_to_target`, `reset` and `refresh_system`.

use prompt::{summarized_marker, with_speaker, ChatMessage, MessageRole};
use tracing::{debug, info};

use super::policy::BudgetPolicy;
use super::types::{Compaction, CompactionKind, ContextStatus, TrimReport};
use super::utils::{count_words, LengthProxy};
use crate::persona::CurrentPersonas;

/// Bounded, system-headed message history for one session.
#[derive(Debug, Clone)]
pub struct ConversationBuffer {
    messages: Vec<ChatMessage>,
    /// Most recently composed system message; restored at index 0 if it is ever displaced.
    system: ChatMessage,
    policy: BudgetPolicy,
    turns: usize,
    last_cleanup: usize,
}

impl ConversationBuffer {
    /// Creates an initialized buffer holding only `system`.
    pub fn new(policy: BudgetPolicy, system: ChatMessage) -> Self {
        let system = as_system(system);
        Self {
            messages: vec![system.clone()],
            system,
            policy,
            turns: 0,
            last_cleanup: 0,
        }
    }

    /// Discards every message and starts over from `system`. Turn counters restart too.
    pub fn reset(&mut self, system: ChatMessage) {
        let dropped = self.messages.len().saturating_sub(1);
        self.system = as_system(system);
        self.messages = vec![self.system.clone()];
        self.turns = 0;
        self.last_cleanup = 0;
        info!(dropped, "Conversation cleared");
    }

    /// Replaces the system message at index 0 after personas or key events changed.
    pub fn refresh_system(&mut self, system: ChatMessage) {
        self.system = as_system(system);
        match self.messages.first_mut() {
            Some(head) if head.is_system() => *head = self.system.clone(),
            _ => self.messages.insert(0, self.system.clone()),
        }
    }

    /// Appends a user or assistant turn, prefixed with the speaker's name when one is set.
    ///
    /// Runs threshold compaction afterwards; returns it when it fired.
    pub fn append(
        &mut self,
        role: MessageRole,
        raw_content: &str,
        personas: &CurrentPersonas,
    ) -> Option<Compaction> {
        let content = with_speaker(personas.speaker(role), raw_content);
        self.messages.push(ChatMessage { role, content });
        self.ensure_system_head();

        let total = LengthProxy::Chars.total(&self.messages);
        debug!(
            role = role.as_str(),
            total_length = total,
            threshold = self.policy.threshold(),
            message_count = self.messages.len(),
            "Message appended"
        );
        if !self.policy.exceeds_threshold(total) {
            return None;
        }
        Some(self.compact_threshold(personas))
    }

    /// Marks one turn complete and runs the periodic cleanup when it is due.
    pub fn finish_turn(&mut self) -> Option<Compaction> {
        self.turns += 1;
        if !self.policy.cleanup_due(self.turns, self.last_cleanup) {
            return None;
        }
        self.last_cleanup = self.turns;

        let before = self.messages.len();
        let keep = self.policy.periodic_keep_count(before);
        let tail = self.tail(keep, false);
        self.messages = std::iter::once(self.head()).chain(tail).collect();

        let compaction = Compaction {
            kind: CompactionKind::Periodic,
            before,
            after: self.messages.len(),
            marker_inserted: false,
        };
        info!(
            turns = self.turns,
            before = compaction.before,
            after = compaction.after,
            "Periodic conversation cleanup"
        );
        Some(compaction)
    }

    /// Keeps the newest messages whose cumulative word count, system message included, stays
    /// within `target_percentage` of the context limit. Stops at the first message that does not fit.
    pub fn trim_to_target(&mut self, target_percentage: f64) -> TrimReport {
        let target = self.policy.target_tokens(target_percentage);
        let head = self.head();
        let mut current = count_words(&head.content);
        let mut kept: Vec<ChatMessage> = Vec::new();

        for message in self.messages.iter().skip(1).rev() {
            let words = count_words(&message.content);
            if (current + words) as f64 <= target {
                kept.push(message.clone());
                current += words;
            } else {
                break;
            }
        }
        kept.reverse();

        let before = self.messages.len();
        self.messages = std::iter::once(head).chain(kept).collect();

        let report = TrimReport {
            remaining_messages: self.messages.len(),
            current_usage_percentage: self.policy.usage_percentage(current),
        };
        info!(
            target_percentage,
            before,
            remaining = report.remaining_messages,
            usage = report.current_usage_percentage,
            "Context trimmed"
        );
        report
    }

    /// Word-count usage of the whole buffer.
    pub fn status(&self) -> ContextStatus {
        let total_tokens = LengthProxy::Words.total(&self.messages);
        ContextStatus {
            total_tokens,
            context_limit: self.policy.context_limit(),
            usage_percentage: self.policy.usage_percentage(total_tokens),
        }
    }

    /// Adopts a new context limit; applies from the next append or trim.
    pub fn set_policy(&mut self, policy: BudgetPolicy) {
        self.policy = policy;
    }

    pub fn policy(&self) -> &BudgetPolicy {
        &self.policy
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn system_message(&self) -> &ChatMessage {
        &self.system
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when only the system message is present.
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == 1
    }

    /// Completed turns since creation or the last reset.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Total size under the given proxy.
    pub fn total_length(&self, proxy: LengthProxy) -> usize {
        proxy.total(&self.messages)
    }

    fn compact_threshold(&mut self, personas: &CurrentPersonas) -> Compaction {
        let before = self.messages.len();
        let keep = self.policy.threshold_keep_count();
        let tail = self.tail(keep, true);
        self.messages = std::iter::once(self.head()).chain(tail).collect();

        let marker_inserted = self.messages.len() > 2;
        if marker_inserted {
            let marker = summarized_marker(
                personas.display_name(MessageRole::Assistant),
                personas.display_name(MessageRole::User),
            );
            self.messages.insert(1, marker);
        }

        let compaction = Compaction {
            kind: CompactionKind::Threshold,
            before,
            after: self.messages.len(),
            marker_inserted,
        };
        info!(
            before = compaction.before,
            after = compaction.after,
            kept = keep,
            limit = self.policy.context_limit(),
            "Conversation compacted"
        );
        compaction
    }

    /// The newest `keep` messages after index 0, oldest first. With `skip_markers`, earlier
    /// summary markers are left out so at most one marker exists after compaction.
    fn tail(&self, keep: usize, skip_markers: bool) -> Vec<ChatMessage> {
        let rest: Vec<&ChatMessage> = self
            .messages
            .iter()
            .skip(1)
            .filter(|m| !(skip_markers && m.is_system()))
            .collect();
        let start = rest.len().saturating_sub(keep);
        rest[start..].iter().map(|m| (*m).clone()).collect()
    }

    fn head(&self) -> ChatMessage {
        match self.messages.first() {
            Some(head) if head.is_system() => head.clone(),
            _ => self.system.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn take_head(&mut self) -> Option<ChatMessage> {
        (!self.messages.is_empty()).then(|| self.messages.remove(0))
    }

    fn ensure_system_head(&mut self) {
        if self.messages.first().map_or(true, |m| !m.is_system()) {
            debug!("System message displaced from head; restoring");
            self.messages.insert(0, self.system.clone());
        }
    }
}

fn as_system(message: ChatMessage) -> ChatMessage {
    ChatMessage::system(message.content)
}
