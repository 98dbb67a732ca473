use k8s_diff::{
    Error,
    differ::{DifferenceResult, ObjectDiffer},
    load::{load_objects, load_rule_set},
    rules::{DefaultingRule, KubectlDryRun},
};

use crate::cli::Cli;

/// Loads both sides, runs every rule and compares what is left.
///
/// When a rule fails, the bookkeeping of that rule is printed to stderr
/// before the error is returned.
pub fn handle_diff_command(args: &Cli) -> Result<DifferenceResult, Error> {
    let rule_set = load_rule_set(&args.rules)?;
    let defaulting = (!args.skip_defaults).then(|| {
        DefaultingRule::new(Box::new(KubectlDryRun::new(
            &args.kubectl,
            args.kube_context.clone(),
        )))
    });
    let pipeline = rule_set.into_pipeline(defaulting);

    println!("Comparing {} {}", args.dir_a.display(), args.dir_b.display());

    let mut differ = ObjectDiffer::new();
    differ.load_left(load_objects(&args.dir_a)?)?;
    differ.load_right(load_objects(&args.dir_b)?)?;

    for rule in &pipeline {
        println!("Applying rule: {}", rule.name());
        if let Err(e) = differ.apply_rule(rule) {
            if let Some(rule_debug) = differ.debug_info().last() {
                eprintln!("{rule_debug}");
            }
            return Err(e);
        }
    }

    Ok(differ.calculate_difference())
}
