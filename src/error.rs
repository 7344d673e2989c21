use crate::tables::Line;

/// An error that can be traced back to a line, either in the source program
/// or in an assembly listing.
pub trait LineError {
    fn line(&self) -> Line;
    fn describe(&self) -> String;

    /// Format the error the way a driver would report it to the user.
    fn report(&self) -> String {
        format!("line {}: {}", self.line(), self.describe())
    }
}
