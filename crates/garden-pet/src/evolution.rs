//! The evolution resolver: the single place Type and Form are derived.
//!
//! Every call site that mutates a field affecting Type or Form funnels
//! through [`resolve`]. The resolver is a pure function: identical
//! inputs always produce the identical [`ChaoType`], and re-running it
//! on an unchanged snapshot is a no-op.

use garden_types::{Alignment, ChaoType, Form, PetSnapshot, Shape};

use crate::config::LifecycleConfig;

/// Inputs to one resolver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveInput {
    /// The currently stored type (carries the locked alignment and the
    /// Form-4 lineage prefix).
    pub current: ChaoType,
    /// Highest level among the five trainable stats.
    pub max_level: u8,
    /// Run/power evolution axis.
    pub run_power: i8,
    /// Swim/fly evolution axis.
    pub swim_fly: i8,
    /// Alignment axis.
    pub dark_hero: i8,
}

impl ResolveInput {
    /// Collect the resolver inputs from a snapshot.
    pub fn from_snapshot(pet: &PetSnapshot) -> Self {
        Self {
            current: pet.chao_type,
            max_level: pet.max_level(),
            run_power: pet.run_power,
            swim_fly: pet.swim_fly,
            dark_hero: pet.dark_hero,
        }
    }
}

/// Derive the alignment label from the `dark_hero` axis.
pub const fn alignment_from_axis(dark_hero: i8, config: &LifecycleConfig) -> Alignment {
    if dark_hero >= config.hero_threshold {
        Alignment::Hero
    } else if dark_hero <= config.dark_threshold {
        Alignment::Dark
    } else {
        Alignment::Neutral
    }
}

/// Derive the shape suffix from the evolution axes.
///
/// The coupling rule keeps at most one axis at an extreme; if both ever
/// are, the `run_power` reading wins.
pub const fn shape_from_axes(run_power: i8, swim_fly: i8, axis_extreme: i8) -> Shape {
    if run_power >= axis_extreme {
        Shape::Power
    } else if run_power <= axis_extreme.saturating_neg() {
        Shape::Run
    } else if swim_fly >= axis_extreme {
        Shape::Fly
    } else if swim_fly <= axis_extreme.saturating_neg() {
        Shape::Swim
    } else {
        Shape::Normal
    }
}

/// Resolve the next Type and Form from the current state.
///
/// - Alignment recomputes from `dark_hero` until Form 3, where it locks
///   to the value embedded in the current type.
/// - The shape suffix always tracks the axes.
/// - Form promotes at most one step per call (a stat jump past two
///   thresholds needs a second call, one per feed/decay event).
/// - The Form-4 prefix carries the Form-3 suffix at the moment of
///   promotion and sticks on re-entry.
pub fn resolve(input: ResolveInput, config: &LifecycleConfig) -> ChaoType {
    let alignment = if input.current.form.alignment_locked() {
        input.current.alignment
    } else {
        alignment_from_axis(input.dark_hero, config)
    };

    let suffix = shape_from_axes(input.run_power, input.swim_fly, config.axis_extreme);

    let form = match input.current.form {
        Form::First if input.max_level >= config.form2_level => Form::Second,
        Form::Second if input.max_level >= config.form3_level => Form::Third,
        Form::Third if input.max_level >= config.form4_level => Form::Fourth,
        other => other,
    };

    let prefix = match (input.current.form, form) {
        // Promotion into Form 4 carries the Form-3 suffix as lineage.
        (Form::Third, Form::Fourth) => input.current.suffix,
        // Re-entry at Form 4 keeps the established lineage.
        (Form::Fourth, Form::Fourth) => input.current.prefix,
        _ => Shape::Normal,
    };

    ChaoType {
        alignment,
        prefix,
        suffix,
        form,
    }
}
