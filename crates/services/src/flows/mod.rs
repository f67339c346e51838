mod practice;
mod test_flow;

pub use practice::PracticeFlow;
pub use test_flow::TestFlow;
