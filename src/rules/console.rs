use crate::OutputDescriptor;
use crate::engine::{Keywords, PatternId, Recognized, Recognizer, ScanContext};

/// `MESS 'name=' name;` prints `name=value` into the console report.
pub(crate) fn recognizer() -> Recognizer {
    Recognizer { name: "mess", triggers: Keywords::MESS, run: recognize_messages }
}

fn recognize_messages(ctx: &ScanContext<'_>, out: &mut Recognized) {
    let re = PatternId::Message.regex();
    for statement in ctx.with_keywords(Keywords::MESS) {
        if let Some(caps) = re.captures(statement.as_str()) {
            out.bind("mess", &caps[1], OutputDescriptor::ConsoleScalar);
        }
    }
}
