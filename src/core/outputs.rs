//! Registry of display outputs announced by the display session.
//!
//! Outputs come and go at runtime and learn their name, description and
//! ramp size asynchronously. The registry applies the configured allow-list
//! as that information arrives and flags outputs that still need the current
//! temperature applied.

use crate::backend::{Output, OutputId};

#[derive(Debug, Clone, Default)]
pub struct OutputRegistry {
    outputs: Vec<Output>,
    allow_list: Vec<String>,
}

impl OutputRegistry {
    /// An empty `allow_list` enables every output.
    pub fn new(allow_list: Vec<String>) -> Self {
        Self {
            outputs: Vec::new(),
            allow_list,
        }
    }

    fn allows(&self, output: &Output) -> bool {
        if self.allow_list.is_empty() {
            return true;
        }
        self.allow_list.iter().any(|entry| {
            output.name.as_deref() == Some(entry.as_str())
                || output.description.as_deref() == Some(entry.as_str())
        })
    }

    fn get_mut(&mut self, id: OutputId) -> Option<&mut Output> {
        self.outputs.iter_mut().find(|output| output.id == id)
    }

    /// Re-evaluate the allow-list for `id`, flagging newly enabled outputs.
    fn refresh_enabled(&mut self, id: OutputId) {
        let Some(index) = self.outputs.iter().position(|output| output.id == id) else {
            return;
        };
        let enabled = self.allows(&self.outputs[index]);
        let output = &mut self.outputs[index];
        if enabled && !output.enabled {
            output.needs_apply = true;
            log_decorated!("Output '{}' enabled", output.display_name());
        }
        output.enabled = enabled;
    }

    /// Register a new output. Re-adding a known id is a no-op.
    pub fn add(&mut self, id: OutputId) {
        if self.get(id).is_some() {
            return;
        }
        self.outputs.push(Output::new(id));
        self.refresh_enabled(id);
    }

    /// Forget an output. Returns whether it was known.
    pub fn remove(&mut self, id: OutputId) -> bool {
        let Some(index) = self.outputs.iter().position(|output| output.id == id) else {
            return false;
        };
        let output = self.outputs.remove(index);
        log_decorated!(
            "Output '{}' removed, {} remaining",
            output.display_name(),
            self.outputs.len()
        );
        true
    }

    pub fn set_name(&mut self, id: OutputId, name: &str) {
        if let Some(output) = self.get_mut(id) {
            output.name = Some(name.to_string());
            self.refresh_enabled(id);
        }
    }

    pub fn set_description(&mut self, id: OutputId, description: &str) {
        if let Some(output) = self.get_mut(id) {
            output.description = Some(description.to_string());
            self.refresh_enabled(id);
        }
    }

    /// Record the ramp size reported for an output. Sizes below 2 mark the
    /// output as unusable.
    pub fn set_ramp_size(&mut self, id: OutputId, ramp_size: usize) {
        if let Some(output) = self.get_mut(id) {
            output.ramp_size = (ramp_size >= 2).then_some(ramp_size);
            output.needs_apply = output.ramp_size.is_some();
        }
    }

    /// The session revoked gamma control for an output.
    pub fn control_lost(&mut self, id: OutputId) {
        if let Some(output) = self.get_mut(id) {
            output.ramp_size = None;
            output.needs_apply = false;
            log_warning!("Gamma control lost for '{}'", output.display_name());
        }
    }

    pub fn mark_applied(&mut self, id: OutputId) {
        if let Some(output) = self.get_mut(id) {
            output.needs_apply = false;
        }
    }

    pub fn get(&self, id: OutputId) -> Option<&Output> {
        self.outputs.iter().find(|output| output.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Output> {
        self.outputs.iter()
    }

    /// Outputs that can receive ramps right now.
    pub fn ready(&self) -> impl Iterator<Item = &Output> {
        self.outputs.iter().filter(|output| output.is_ready())
    }

    /// Whether some ready output still needs the current temperature.
    pub fn needs_refresh(&self) -> bool {
        self.ready().any(|output| output.needs_apply)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
