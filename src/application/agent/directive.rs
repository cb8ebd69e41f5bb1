/// One reasoning step's decision, parsed from a completion output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// The model committed to a tool call.
    UseTool { name: String, input: String },
    /// The model concluded with an answer for the caller.
    FinalAnswer { text: String },
    /// The output matched neither shape; recoverable, never a hard failure.
    Malformed { raw: String },
}
