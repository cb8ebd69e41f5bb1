use super::directive::Directive;

const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const ACTION_MARKER: &str = "Action:";
const ACTION_INPUT_MARKER: &str = "Action Input:";
const OBSERVATION_MARKER: &str = "\nObservation";

/// Parses one completion output into a directive.
///
/// Never fails: anything matching neither shape comes back as `Malformed`,
/// which the loop treats as one recoverable iteration. A syntactically
/// complete final-answer block (marker plus non-empty text) takes precedence
/// over a tool-use shape in the same output; otherwise tool-use is tried
/// first.
pub fn parse_directive(content: &str) -> Directive {
    if let Some(text) = extract_final_answer(content) {
        return Directive::FinalAnswer { text };
    }
    if let Some((name, input)) = extract_action(content) {
        return Directive::UseTool { name, input };
    }
    Directive::Malformed {
        raw: content.to_string(),
    }
}

fn extract_final_answer(content: &str) -> Option<String> {
    let start = content.find(FINAL_ANSWER_MARKER)?;
    let text = content[start + FINAL_ANSWER_MARKER.len()..].trim();
    // A block is complete only when the marker is followed by answer text
    // that is not itself another action.
    if text.is_empty() || extract_action(text).is_some() {
        None
    } else {
        Some(text.to_string())
    }
}

fn extract_action(content: &str) -> Option<(String, String)> {
    let action_start = content.find(ACTION_MARKER)?;
    let after_action = &content[action_start + ACTION_MARKER.len()..];
    let input_start = after_action.find(ACTION_INPUT_MARKER)?;

    let name = after_action[..input_start].trim().trim_matches('"').trim();
    if name.is_empty() {
        return None;
    }

    let mut input = after_action[input_start + ACTION_INPUT_MARKER.len()..].trim();
    // The stop sequence normally prevents this, but cut at a hallucinated
    // observation anyway. A trailing final-answer marker is not part of the
    // input either.
    if let Some(end) = input.find(OBSERVATION_MARKER) {
        input = input[..end].trim();
    }
    if let Some(end) = input.find(FINAL_ANSWER_MARKER) {
        input = input[..end].trim();
    }
    let input = input.trim_matches('"').trim();

    Some((name.to_string(), input.to_string()))
}
