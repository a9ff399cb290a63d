use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

// Helper function to create a temporary input file
fn create_test_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join(name);
    fs::write(&file_path, content).expect("Failed to write test file");
    (temp_dir, file_path)
}

// Helper function to run the modeler binary
fn run_modeler(subcommand: &str, args: &[&str]) -> Result<Output, std::io::Error> {
    Command::new(env!("CARGO_BIN_EXE_modeler"))
        .arg(subcommand)
        .args(args)
        .env_remove("MODELER_SOLVER")
        .output()
}

fn csv_rows(path: &PathBuf) -> Vec<Vec<String>> {
    let content = fs::read_to_string(path).expect("Failed to read CSV file");
    content
        .lines()
        .skip(1)
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

mod cli_tests {
    use super::*;

    #[test]
    fn test_unknown_solver_is_rejected() {
        let output = run_modeler("diet", &["--solver", "simplex"]).expect("Failed to run modeler");
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Invalid solver"), "stderr: {}", stderr);
    }

    #[test]
    fn test_unknown_solver_in_environment() {
        let output = Command::new(env!("CARGO_BIN_EXE_modeler"))
            .arg("scheduling")
            .env("MODELER_SOLVER", "simplex")
            .output()
            .expect("Failed to run modeler");
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Invalid solver"), "stderr: {}", stderr);
    }

    #[test]
    fn test_missing_edge_list() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing.txt");
        let output = run_modeler("coloring", &["--edges", missing.to_str().unwrap()]).expect("Failed to run modeler");
        assert!(!output.status.success());
    }

    #[test]
    fn test_malformed_edge_list() {
        let (_temp_dir, input) = create_test_file("graph.txt", "0 1\n1 two\n");
        let output = run_modeler("coloring", &["--edges", input.to_str().unwrap()]).expect("Failed to run modeler");
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("bad vertex"), "stderr: {}", stderr);
    }
}

#[cfg(feature = "coin_cbc")]
mod solve_tests {
    use super::*;

    #[test]
    fn test_diet_csv_output() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let csv_path = temp_dir.path().join("diet.csv");

        let output = run_modeler("diet", &["--csv", csv_path.to_str().unwrap()]).expect("Failed to run modeler");
        assert!(
            output.status.success(),
            "Command should succeed. stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Total cost"), "stdout: {}", stdout);

        let content = fs::read_to_string(&csv_path).expect("Failed to read CSV file");
        assert!(content.starts_with("food,servings\n"));
        assert_eq!(csv_rows(&csv_path).len(), 6);
    }

    #[test]
    fn test_coloring_from_edge_list() {
        // a triangle with a pendant vertex
        let (_temp_dir, input) = create_test_file("graph.txt", "# triangle\n0 1\n1 2\n2 0\n\n2 3\n");
        let csv_path = input.with_file_name("colors.csv");

        let output = run_modeler(
            "coloring",
            &["--edges", input.to_str().unwrap(), "--csv", csv_path.to_str().unwrap()],
        )
        .expect("Failed to run modeler");
        assert!(
            output.status.success(),
            "Command should succeed. stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Colors used: 3"), "stdout: {}", stdout);

        let colors: Vec<usize> = csv_rows(&csv_path)
            .iter()
            .map(|row| row[1].parse().expect("color is an integer"))
            .collect();
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[2], colors[0]);
        assert_ne!(colors[2], colors[3]);
    }

    #[test]
    fn test_coloring_builtin_graphs() {
        let output = run_modeler("coloring", &["--graph", "complete", "--size", "5"]).expect("Failed to run modeler");
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("Colors used: 5"));

        let output = run_modeler("coloring", &[]).expect("Failed to run modeler");
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("Colors used: 3"));
    }

    #[test]
    fn test_facility_csv_output() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let csv_path = temp_dir.path().join("facility.csv");

        let output = run_modeler("facility", &["--csv", csv_path.to_str().unwrap()]).expect("Failed to run modeler");
        assert!(
            output.status.success(),
            "Command should succeed. stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        // every unit of the 90 demanded is shipped
        let shipped: f64 = csv_rows(&csv_path)
            .iter()
            .map(|row| row[2].parse::<f64>().expect("units are numeric"))
            .sum();
        assert!((shipped - 90.0).abs() < 1e-2, "shipped {}", shipped);
    }

    #[test]
    fn test_scheduling_is_ordered_by_start() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let csv_path = temp_dir.path().join("schedule.csv");

        let output = run_modeler("scheduling", &["--csv", csv_path.to_str().unwrap(), "--time-limit", "60"])
            .expect("Failed to run modeler");
        assert!(
            output.status.success(),
            "Command should succeed. stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let rows = csv_rows(&csv_path);
        assert_eq!(rows.len(), 5);
        let times: Vec<(f64, f64)> = rows
            .iter()
            .map(|row| (row[1].parse().unwrap(), row[2].parse().unwrap()))
            .collect();
        for pair in times.windows(2) {
            assert!(pair[0].1 <= pair[1].0 + 1e-3, "overlap in {:?}", pair);
        }
    }
}
