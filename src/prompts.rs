pub const INPUT_TITLE_TEXT: &str = "Text to process (single line)";
pub const INPUT_TITLE_URL: &str = "Article URL";
pub const OUTPUT_TITLE: &str = "Result";
pub const OUTPUT_PLACEHOLDER: &str = "Your processed text will appear here.";
pub const EMPTY_RESULT_PLACEHOLDER: &str = "The backend returned no result.";

pub const CONTROLS_READY: &str =
    "<C-c>: Exit | Tab: Text/URL | <C-p>: Paraphrase | <C-s>: Summarize";
pub const CONTROLS_EMPTY_INPUT: &str = "<C-c>: Exit | Tab: Text/URL | Type something to process";
pub const CONTROLS_PROCESSING: &str = "<C-c>: Exit | Tab: Text/URL | Processing...";
