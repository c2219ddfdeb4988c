//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::field::FieldKind;
use crate::domain::provider::{Provider, SCHEMA};
use crate::domain::status::EntityState;
use crate::domain::step::Step;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the provider registry: cloud type tag, provider, auth type.
    pub fn render_providers(&self) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header("Providers:");
        for (tag, kind) in SCHEMA {
            let auth = kind.auth_type().unwrap_or("-");
            self.ctx.line(format_args!(
                "  {tag:<12} {:<12} {}",
                kind.name(),
                auth.style(self.ctx.styles.dim)
            ));
        }
    }

    /// Render a provider's credential fields, masking secrets.
    pub fn render_fields(&self, provider: &Provider) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header(&format!("{} credential:", provider.kind().name()));
        if let Some(auth) = provider.auth_type() {
            self.ctx.kv("auth-type", auth);
        }
        for field in provider.fields() {
            let value = match field.kind {
                FieldKind::Secret if !field.value().is_empty() => "********".to_string(),
                _ => field.value().to_string(),
            };
            let marker = if field.required { "*" } else { " " };
            self.ctx.line(format_args!(
                "  {marker}{:<28} {value}",
                field.key.style(self.ctx.styles.dim)
            ));
            if let Some(err) = field.error() {
                self.ctx.error(&format!("{}: {err}", field.label));
            }
        }
    }

    /// Render unit and machine states.
    pub fn render_status(&self, units: &[EntityState], machines: &[EntityState]) {
        self.ctx.header("Units:");
        if units.is_empty() {
            self.ctx.info("No units deployed.");
        }
        for unit in units {
            self.render_state(unit);
        }
        self.ctx.line("");
        self.ctx.header("Machines:");
        if machines.is_empty() {
            self.ctx.info("No machines.");
        }
        for machine in machines {
            self.render_state(machine);
        }
    }

    fn render_state(&self, state: &EntityState) {
        self.ctx.line(format_args!(
            "  {:<24} {:<12} {}",
            state.id,
            state.current.style(self.ctx.styles.state(&state.current)),
            state.message
        ));
    }

    /// Render a step's title and description ahead of its input prompts.
    pub fn render_step(&self, step: &Step) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.line("");
        let title = if step.title.is_empty() {
            &step.name
        } else {
            &step.title
        };
        self.ctx.header(title);
        if !step.description.is_empty() {
            self.ctx
                .line(format_args!("  {}", step.description.style(self.ctx.styles.dim)));
        }
    }
}
