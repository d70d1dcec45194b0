use crate::{Effect, ExtractionSession, Msg, Phase, Termination};

/// Pure update function: applies a message to the session and returns any effects.
///
/// Messages that do not fit the current phase, or that refer to a page other
/// than the current one, leave the session untouched.
pub fn update(mut session: ExtractionSession, msg: Msg) -> (ExtractionSession, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if *session.phase() == Phase::Idle {
                session.set_phase(Phase::Fetching);
                vec![Effect::FetchPage {
                    page: session.page(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::PageMissing { page } => {
            if is_current(&session, &Phase::Fetching, page) {
                session.set_phase(Phase::Done(Termination::NotFound));
            }
            Vec::new()
        }
        Msg::FetchFailed { page, reason } => {
            if is_current(&session, &Phase::Fetching, page) {
                session.set_phase(Phase::Aborted { reason });
            }
            Vec::new()
        }
        Msg::PageLoaded { page, body } => {
            if !is_current(&session, &Phase::Fetching, page) {
                return (session, Vec::new());
            }
            if session.rules().signals_no_questions(&body) {
                session.set_phase(Phase::Done(Termination::NoQuestionsMarker));
                Vec::new()
            } else if body.trim().is_empty() {
                session.set_phase(Phase::Done(Termination::EmptyBody));
                Vec::new()
            } else {
                session.set_phase(Phase::Evaluating);
                vec![Effect::ParsePage { page, body }]
            }
        }
        Msg::PageParsed { page, result } => {
            if !is_current(&session, &Phase::Evaluating, page) {
                return (session, Vec::new());
            }
            session.remember_title(result.title);

            let duplicates = session.observe_signature(result.content_signature);
            if duplicates >= session.rules().effective_duplicate_threshold() {
                session.set_phase(Phase::Done(Termination::DuplicateThreshold));
                Vec::new()
            } else if result.records.is_empty() {
                session.set_phase(Phase::Done(Termination::EmptyPage));
                Vec::new()
            } else {
                session.accept_page(result.records);
                session.set_phase(Phase::Fetching);
                vec![
                    Effect::Throttle,
                    Effect::FetchPage {
                        page: session.page(),
                    },
                ]
            }
        }
    };

    (session, effects)
}

fn is_current(session: &ExtractionSession, phase: &Phase, page: u32) -> bool {
    session.phase() == phase && session.page() == page
}
