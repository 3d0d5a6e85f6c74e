pub mod auto_detector;
pub mod dictionary;
pub mod ngram;
pub mod outcome;
pub mod user_dictionary;
