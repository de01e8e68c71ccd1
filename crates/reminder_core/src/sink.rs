/// Receiver of ready-to-display reminders, owned by the presentation layer.
///
/// Implementations handle their own rendering failures; nothing is reported
/// back to the scheduler.
pub trait PresentationSink: Send + Sync {
    fn show(&self, text: &str, reference: Option<&str>);

    /// Non-fatal notice, e.g. a reminder that could not be produced.
    fn notice(&self, message: &str);
}
