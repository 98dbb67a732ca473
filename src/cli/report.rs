use std::{
    io::{self, Write},
    path::Path,
};

use k8s_diff::{
    differ::{DifferenceResult, ObjectDifference},
    object::ResourceKey,
    patch::Patch,
};

pub fn print_report(
    out: &mut impl Write,
    result: &DifferenceResult,
    dir_a: &Path,
    dir_b: &Path,
) -> io::Result<()> {
    print_keys(out, "Successfully Validated:", &result.matching_objects)?;
    print_keys(
        out,
        &format!("Objects missing from {}", dir_b.display()),
        &result.missing_objects,
    )?;
    print_keys(
        out,
        &format!("Objects missing from {}", dir_a.display()),
        &result.extra_objects,
    )?;

    if !result.different_objects.is_empty() {
        writeln!(out, "Property-level Differences Detected")?;
        for difference in &result.different_objects {
            print_difference(out, difference, dir_a, dir_b)?;
        }
    }
    Ok(())
}

fn print_keys(out: &mut impl Write, title: &str, keys: &[ResourceKey]) -> io::Result<()> {
    if keys.is_empty() {
        return Ok(());
    }
    writeln!(out, "{title}")?;
    for key in keys {
        writeln!(out, "\t {key}")?;
    }
    Ok(())
}

fn print_difference(
    out: &mut impl Write,
    difference: &ObjectDifference,
    dir_a: &Path,
    dir_b: &Path,
) -> io::Result<()> {
    writeln!(out, "{}", difference.key())?;
    print_patch(
        out,
        &format!("{} -> {}", dir_a.display(), dir_b.display()),
        &difference.patch.left_to_right,
    )?;
    print_patch(
        out,
        &format!("{} -> {}", dir_b.display(), dir_a.display()),
        &difference.patch.right_to_left,
    )
}

fn print_patch(out: &mut impl Write, title: &str, patch: &Patch) -> io::Result<()> {
    writeln!(out, "\t {title}:")?;
    for op in patch {
        writeln!(out, "\t\t {op}")?;
    }
    Ok(())
}
