#![allow(clippy::unwrap_used)]

use crate::{
    CaptureDevice, Effect, Intent, Interview, InterviewEvent, RecorderError, RecordingOptions,
    RecordingPhase,
    tests::support::{ChunkQueue, ManualTimer, MockDevice, catalog},
};

use std::sync::Arc;

struct Harness {
    interview: Interview<MockDevice, ManualTimer>,
    device: Arc<MockDevice>,
    timer: ManualTimer,
    queue: ChunkQueue,
}

fn harness(count: usize, start: usize, max_duration_seconds: u32) -> Harness {
    harness_with(MockDevice::new(), count, start, max_duration_seconds)
}

fn harness_with(
    device: Arc<MockDevice>,
    count: usize,
    start: usize,
    max_duration_seconds: u32,
) -> Harness {
    let timer = ManualTimer::default();
    let queue = ChunkQueue::default();
    let interview = Interview::new(
        catalog(count),
        &format!("q{}", start),
        Arc::clone(&device),
        timer.clone(),
        queue.sink(),
        RecordingOptions::new(max_duration_seconds).unwrap(),
    )
    .unwrap();

    Harness {
        interview,
        device,
        timer,
        queue,
    }
}

impl Harness {
    fn intent(&mut self, intent: Intent) -> Vec<Effect> {
        self.interview.handle(InterviewEvent::User(intent))
    }

    /// Record intent plus the device round-trip the shell would perform.
    fn record(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        for effect in self.intent(Intent::Record) {
            match effect {
                Effect::AcquireDevice { ticket } => {
                    let result = self.device.acquire();
                    effects.extend(
                        self.interview
                            .handle(InterviewEvent::DeviceAcquired { ticket, result }),
                    );
                }
                other => effects.push(other),
            }
        }
        effects
    }

    fn tick(&mut self) -> Vec<Effect> {
        match self.timer.running() {
            Some(generation) => self
                .interview
                .handle(InterviewEvent::TimerTick { generation }),
            None => Vec::new(),
        }
    }

    fn emit(&mut self, bytes: &[u8]) {
        self.device.emit(bytes);
        for (recorder, chunk) in self.queue.drain() {
            self.interview
                .handle(InterviewEvent::ChunkReceived { recorder, chunk });
        }
    }

    fn flags(&self) -> Vec<bool> {
        self.interview.navigator().answered().as_slice().to_vec()
    }
}

/// WHAT: Interview opens on the selected question with all flags unset
/// WHY: The candidate picks where to start from the question list
#[test]
fn given_selected_question_when_opening_interview_then_starts_at_its_position() {
    // Given/When: A four question interview opened on q2
    let h = harness(4, 2, 10);

    // Then: Index 2, four unset flags, idle take
    assert_eq!(h.interview.navigator().current_index(), 2);
    assert_eq!(h.flags(), vec![false; 4]);
    assert_eq!(h.interview.recording().phase(), RecordingPhase::Idle);
    assert_eq!(
        h.interview.current_question().map(|q| q.id.as_str()),
        Some("q2")
    );
}

/// WHAT: Opening on an unknown question fails
/// WHY: The start position must exist
#[test]
fn given_unknown_start_when_opening_interview_then_unknown_question_error() {
    // Given/When: An interview opened on a missing id
    let result = Interview::new(
        catalog(2),
        "missing",
        MockDevice::new(),
        ManualTimer::default(),
        ChunkQueue::default().sink(),
        RecordingOptions::default(),
    );

    // Then: UnknownQuestion
    assert!(matches!(result, Err(RecorderError::UnknownQuestion { .. })));
}

/// WHAT: Previous marks the departed question, Next does not
/// WHY: Backward navigation counts as answering; forward does not
#[test]
fn given_unanswered_middle_question_when_navigating_then_asymmetric_flags() {
    // Given: Three questions, none answered, on index 1, nothing recorded
    let mut backward = harness(3, 1, 10);
    let mut forward = harness(3, 1, 10);

    // When: One interview goes previous, the other next
    let back_effects = backward.intent(Intent::Previous);
    let ahead_effects = forward.intent(Intent::Next);

    // Then: Previous set flag[1] and landed on an empty idle take at 0
    assert_eq!(backward.flags(), vec![false, true, false]);
    assert_eq!(backward.interview.navigator().current_index(), 0);
    assert_eq!(backward.interview.recording().phase(), RecordingPhase::Idle);
    assert!(backward.interview.recording().captured_media().is_empty());
    assert_eq!(
        back_effects,
        vec![
            Effect::AnsweredChanged {
                question_index: 1,
                answered: true
            },
            Effect::QuestionChanged { question_index: 0 },
        ]
    );

    // Then: Next left flag[1] unset and landed on 2
    assert_eq!(forward.flags(), vec![false, false, false]);
    assert_eq!(forward.interview.navigator().current_index(), 2);
    assert_eq!(
        ahead_effects,
        vec![Effect::QuestionChanged { question_index: 2 }]
    );
}

/// WHAT: The time limit auto-stops the take and answers the question
/// WHY: A candidate who runs out of time has still answered
#[test]
fn given_recording_when_limit_reached_then_reviewing_and_answered() {
    // Given: A recording take with a 2 second limit
    let mut h = harness(2, 0, 2);
    assert!(h.record().is_empty());
    h.emit(&[1, 2, 3]);

    // When: Two ticks arrive
    let first = h.tick();
    let second = h.tick();

    // Then: The second tick stops the take and sets flag[0]
    assert!(first.is_empty());
    assert_eq!(
        second,
        vec![Effect::AnsweredChanged {
            question_index: 0,
            answered: true
        }]
    );
    assert_eq!(h.interview.recording().phase(), RecordingPhase::Reviewing);
    assert_eq!(h.interview.recording().elapsed_seconds(), 2);
    assert_eq!(h.flags(), vec![true, false]);
    assert!(h.tick().is_empty());
}

/// WHAT: Manual stop answers the question; a racing second stop is a no-op
/// WHY: Stop is guarded so auto-stop and manual stop never both run
#[test]
fn given_recording_when_stopped_twice_then_single_transition() {
    // Given: A recording take one second in
    let mut h = harness(2, 0, 10);
    h.record();
    h.tick();

    // When: Stopping twice
    let first = h.intent(Intent::Stop);
    let second = h.intent(Intent::Stop);

    // Then: One answered effect, one release, timer idle
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(h.flags(), vec![true, false]);
    assert_eq!(h.device.released(), 1);
    assert!(h.timer.running().is_none());
    assert_eq!(h.interview.recording().elapsed_seconds(), 1);
}

/// WHAT: Reset clears the take and the answered flag; refused while recording
/// WHY: Re-recording starts from an unanswered question
#[test]
fn given_reviewed_take_when_resetting_then_flag_cleared() {
    // Given: A recording take
    let mut h = harness(2, 0, 10);
    h.record();
    h.emit(&[9]);

    // When/Then: Reset while recording does nothing
    assert!(h.intent(Intent::Reset).is_empty());
    assert_eq!(h.interview.recording().phase(), RecordingPhase::Recording);

    // When: Stopping then resetting
    h.intent(Intent::Stop);
    let effects = h.intent(Intent::Reset);

    // Then: Flag cleared, media and elapsed gone
    assert_eq!(
        effects,
        vec![Effect::AnsweredChanged {
            question_index: 0,
            answered: false
        }]
    );
    assert_eq!(h.flags(), vec![false, false]);
    assert!(h.interview.recording().captured_media().is_empty());
    assert_eq!(h.interview.recording().elapsed_seconds(), 0);
    assert_eq!(h.interview.recording().phase(), RecordingPhase::Idle);
}

/// WHAT: Switching questions always starts the destination clean
/// WHY: A take belongs to one visit of one question
#[test]
fn given_reviewed_take_when_going_next_then_destination_clean_and_flag_kept() {
    // Given: Question 0 recorded and under review
    let mut h = harness(3, 0, 10);
    h.record();
    h.emit(&[1]);
    h.tick();
    h.intent(Intent::Stop);

    // When: Going next
    h.intent(Intent::Next);

    // Then: Question 1 idle with no media or elapsed; q0 still answered
    assert_eq!(h.interview.navigator().current_index(), 1);
    assert_eq!(h.interview.recording().phase(), RecordingPhase::Idle);
    assert!(h.interview.recording().captured_media().is_empty());
    assert_eq!(h.interview.recording().elapsed_seconds(), 0);
    assert_eq!(h.flags(), vec![true, false, false]);
}

/// WHAT: Leaving a question mid-take stops the take and answers it
/// WHY: No timer or stream may survive a question switch
#[test]
fn given_recording_when_going_next_then_stopped_released_and_departed_answered() {
    // Given: Recording on question 0
    let mut h = harness(3, 0, 10);
    h.record();
    h.tick();

    // When: Going next mid-take
    let effects = h.intent(Intent::Next);

    // Then: Take stopped, stream released, q0 answered, q1 clean
    assert_eq!(
        effects,
        vec![
            Effect::AnsweredChanged {
                question_index: 0,
                answered: true
            },
            Effect::QuestionChanged { question_index: 1 },
        ]
    );
    assert_eq!(h.device.outstanding(), 0);
    assert!(h.timer.running().is_none());
    assert_eq!(h.interview.recording().elapsed_seconds(), 0);
}

/// WHAT: Going previous mid-take stops the take
/// WHY: Backward navigation force-stops before moving
#[test]
fn given_recording_when_going_previous_then_stopped_and_released() {
    // Given: Recording on question 1
    let mut h = harness(3, 1, 10);
    h.record();
    h.emit(&[4]);

    // When: Going previous
    h.intent(Intent::Previous);

    // Then: Take stopped and released, q1 answered, q0 idle and empty
    assert_eq!(h.device.outstanding(), 0);
    assert!(h.timer.running().is_none());
    assert_eq!(h.flags(), vec![false, true, false]);
    assert_eq!(h.interview.navigator().current_index(), 0);
    assert!(h.interview.recording().captured_media().is_empty());
}

/// WHAT: Device failure is reported without touching any flag
/// WHY: A denied device is transient and user-visible, never fatal
#[test]
fn given_failing_device_when_recording_then_device_unavailable_and_idle() {
    // Given: An interview whose device refuses access
    let mut h = harness_with(MockDevice::failing(), 2, 0, 10);

    // When: Recording
    let effects = h.record();

    // Then: One DeviceUnavailable effect, idle, no media, flags untouched
    assert_eq!(
        effects,
        vec![Effect::DeviceUnavailable {
            reason: "Permission denied".to_string()
        }]
    );
    assert_eq!(h.interview.recording().phase(), RecordingPhase::Idle);
    assert!(h.interview.recording().captured_media().is_empty());
    assert_eq!(h.flags(), vec![false, false]);
    assert!(h.interview.view().can_record);
}

/// WHAT: A stream granted after the candidate moved on is released
/// WHY: Leaving a question cancels in-flight acquisition
#[test]
fn given_pending_acquisition_when_going_next_then_late_stream_released() {
    // Given: A record request whose device result has not arrived
    let mut h = harness(2, 0, 10);
    let effects = h.intent(Intent::Record);
    let ticket = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::AcquireDevice { ticket } => Some(*ticket),
            _ => None,
        })
        .unwrap();
    assert!(!h.interview.view().can_record);

    // When: Going next, then the stream arrives
    h.intent(Intent::Next);
    let result = h.device.acquire();
    let late = h
        .interview
        .handle(InterviewEvent::DeviceAcquired { ticket, result });

    // Then: Nothing started, stream released, no flag changed
    assert!(late.is_empty());
    assert_eq!(h.device.outstanding(), 0);
    assert_eq!(h.interview.recording().phase(), RecordingPhase::Idle);
    assert_eq!(h.flags(), vec![false, false]);
}

/// WHAT: Finish only completes when every question is answered on the last one
/// WHY: The completion gate must not open early
#[test]
fn given_partial_answers_when_finishing_then_gate_holds_until_complete() {
    // Given: Two questions, starting on the first
    let mut h = harness(2, 0, 10);

    // When/Then: Finishing immediately does nothing
    assert!(h.intent(Intent::Finish).is_empty());

    // When/Then: Answer q0 by recording, move on; still not finishable
    h.record();
    h.intent(Intent::Stop);
    h.intent(Intent::Next);
    assert!(!h.interview.view().can_finish);
    assert!(h.intent(Intent::Finish).is_empty());

    // When: Answer q1 and finish
    h.record();
    h.intent(Intent::Stop);
    assert!(h.interview.view().can_finish);
    let effects = h.intent(Intent::Finish);

    // Then: SessionComplete, and further intents are ignored
    assert!(matches!(
        effects.as_slice(),
        [Effect::SessionComplete(completion)] if completion.question_count == 2
    ));
    assert!(h.interview.is_complete());
    assert!(h.intent(Intent::Previous).is_empty());
    assert!(h.intent(Intent::Record).is_empty());
    assert!(!h.interview.view().can_finish);
}

/// WHAT: View flags follow the take lifecycle
/// WHY: The shell renders controls straight from these flags
#[test]
fn given_take_lifecycle_when_viewing_then_controls_match_phase() {
    // Given: An idle interview on the first of two questions
    let mut h = harness(2, 0, 10);

    // Then: Idle shows record and next only
    let idle = h.interview.view();
    assert!(idle.can_record && !idle.can_stop && !idle.can_reset);
    assert!(!idle.can_previous && idle.can_next && !idle.can_finish);
    assert_eq!(idle.countdown, None);
    assert_eq!(idle.title, "Question q0");

    // When: Recording for three seconds
    h.record();
    for _ in 0..3 {
        h.tick();
    }

    // Then: Stop and a countdown
    let recording = h.interview.view();
    assert!(!recording.can_record && recording.can_stop && !recording.can_reset);
    assert_eq!(recording.countdown.as_deref(), Some("00:07"));
    assert!(!recording.show_answered);

    // When: Stopped
    h.intent(Intent::Stop);

    // Then: Reset and the answered check, no countdown
    let reviewing = h.interview.view();
    assert!(!reviewing.can_record && !reviewing.can_stop && reviewing.can_reset);
    assert!(reviewing.show_answered);
    assert_eq!(reviewing.countdown, None);
    assert_eq!(reviewing.answered, vec![true, false]);
}
