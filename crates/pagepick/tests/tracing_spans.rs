//! Span and event coverage under the `tracing` feature.

#![cfg(feature = "tracing")]

use pagepick::{Picker, PickerConfig, Record, RecordStore};
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Default)]
struct EngineTraceState {
    spans: Vec<String>,
    tree_build_has_nodes_field: bool,
    build_duration_recorded: bool,
    messages: Vec<String>,
}

struct EngineTraceCapture {
    state: Arc<Mutex<EngineTraceState>>,
}

impl<S> Layer<S> for EngineTraceCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        let metadata = attrs.metadata();
        let mut state = self.state.lock().expect("engine trace state lock");
        state.spans.push(metadata.name().to_owned());
        if metadata.name() == "tree_index.build" {
            state.tree_build_has_nodes_field |= metadata.fields().field("nodes").is_some();
        }
    }

    fn on_record(
        &self,
        id: &tracing::Id,
        values: &tracing::span::Record<'_>,
        ctx: Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if span.metadata().name() != "tree_index.build" {
            return;
        }

        struct DurationVisitor {
            saw_duration: bool,
        }
        impl tracing::field::Visit for DurationVisitor {
            fn record_u64(&mut self, field: &tracing::field::Field, _value: u64) {
                if field.name() == "build_duration_us" {
                    self.saw_duration = true;
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, _value: &dyn std::fmt::Debug) {
                if field.name() == "build_duration_us" {
                    self.saw_duration = true;
                }
            }
        }

        let mut visitor = DurationVisitor {
            saw_duration: false,
        };
        values.record(&mut visitor);
        if visitor.saw_duration {
            self.state
                .lock()
                .expect("engine trace state lock")
                .build_duration_recorded = true;
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct MessageVisitor {
            message: Option<String>,
        }
        impl tracing::field::Visit for MessageVisitor {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_owned());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_owned());
                }
            }
        }

        let mut visitor = MessageVisitor { message: None };
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            self.state
                .lock()
                .expect("engine trace state lock")
                .messages
                .push(message);
        }
    }
}

fn capture() -> (Arc<Mutex<EngineTraceState>>, tracing::subscriber::DefaultGuard) {
    let state = Arc::new(Mutex::new(EngineTraceState::default()));
    let subscriber = tracing_subscriber::registry().with(EngineTraceCapture {
        state: Arc::clone(&state),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    tracing::callsite::rebuild_interest_cache();
    (state, guard)
}

fn store() -> RecordStore {
    RecordStore::from_records(
        vec![
            Record::new("root-1", "Root 1"),
            Record::new("child-1", "Child 1").with_parent("root-1"),
        ],
        "ws-1",
    )
}

#[test]
fn picker_lifecycle_emits_spans_and_events() {
    let (state, _guard) = capture();

    let mut picker = Picker::new(PickerConfig::default());
    picker.load("ws-1", store());
    picker.toggle_expand("root-1");
    picker.set_query("Child");

    tracing::callsite::rebuild_interest_cache();
    let snapshot = state.lock().expect("engine trace state lock");
    for name in ["tree_index.build", "visible_rows.build", "search.flatten"] {
        assert!(
            snapshot.spans.iter().any(|span| span == name),
            "expected {name} span, saw {:?}",
            snapshot.spans
        );
    }
    assert!(snapshot.tree_build_has_nodes_field, "tree_index.build missing nodes");
    assert!(
        snapshot.build_duration_recorded,
        "tree_index.build did not record build_duration_us"
    );
    for message in ["picker.rebuild", "picker.reset", "picker.toggle_expand"] {
        assert!(
            snapshot.messages.iter().any(|m| m == message),
            "expected {message} event, saw {:?}",
            snapshot.messages
        );
    }
}

#[test]
fn parent_cycle_warns() {
    let (state, _guard) = capture();

    let cyclic = RecordStore::from_records(
        vec![
            Record::new("a", "A").with_parent("b"),
            Record::new("b", "B").with_parent("a"),
        ],
        "ws",
    );
    let mut picker = Picker::default();
    picker.load("ws", cyclic);

    let snapshot = state.lock().expect("engine trace state lock");
    assert!(snapshot.messages.iter().any(|m| m == "tree_index.cycle"));
}
