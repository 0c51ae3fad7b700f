//! CLI smoke test (§8 "Ambient-stack tests"): the binary's `enumerate` subcommand must produce
//! exactly the NDJSON stream the library call produces directly, with no drift from rendering.

use std::fs;
use std::io::Write;
use std::process::Command;

fn s1_topology_json() -> String {
    serde_json::json!({
        "adjacency": {
            "1": ["2", "4", "6"],
            "2": ["5"],
            "3": [],
            "4": ["5"],
            "5": ["3"],
            "6": ["3"]
        },
        "sender": "1",
        "receiver": "3",
        "node_params": {
            "2": {"p_int": 0.10, "delta": 0.30},
            "4": {"p_int": 0.15, "delta": 0.20},
            "5": {"p_int": 0.05, "delta": 0.50},
            "6": {"p_int": 0.20, "delta": 0.10}
        },
        "edge_capacities": [
            {"from": "1", "to": "2", "capacity": 5},
            {"from": "1", "to": "4", "capacity": 5},
            {"from": "1", "to": "6", "capacity": 5},
            {"from": "2", "to": "5", "capacity": 5},
            {"from": "4", "to": "5", "capacity": 5},
            {"from": "5", "to": "3", "capacity": 10},
            {"from": "6", "to": "3", "capacity": 5}
        ]
    })
    .to_string()
}

#[test]
fn enumerate_phase_two_produces_twenty_one_tuples() {
    let dir = std::env::temp_dir().join(format!("multipath-cli-smoke-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let topology_path = dir.join("s1.json");
    let mut file = fs::File::create(&topology_path).unwrap();
    file.write_all(s1_topology_json().as_bytes()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_multipath"))
        .args(["enumerate", topology_path.to_str().unwrap(), "--phase", "two"])
        .output()
        .expect("failed to run multipath binary");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines: Vec<&str> = std::str::from_utf8(&output.stdout)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect();
    assert_eq!(lines.len(), 21);

    for line in lines {
        let _: multipath_sss::strategy::SavTuple = serde_json::from_str(line).unwrap();
    }
}
