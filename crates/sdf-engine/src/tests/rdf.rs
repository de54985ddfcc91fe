use super::*;

fn pair_frame() -> Vec<AtomRow> {
    vec![("Ar", [0.0, 0.0, 0.0]), ("Ar", [1.0, 0.0, 0.0])]
}

#[test]
fn two_atoms_without_pbc_fill_bin_two() {
    let traj = build_traj(&[pair_frame()], None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.0, 0.5);
    let rdf = expect_rdf(run(&mut plan, &traj, FrameWindow::default()).unwrap());
    assert_eq!(rdf.histogram.counts(), &[0, 0, 1, 0]);
    assert_eq!(rdf.stats.frames(), 1);
    assert_eq!(rdf.cutoff, 2.0);
    assert_eq!(
        rdf.table.to_csv_string(),
        "0.00, 0.0000\n0.25, 0.0000 \n0.75, 0.0000 \n1.25, 0.2037 \n1.75, 0.0000 \n2.0, 0.0000 \n"
    );
}

#[test]
fn truncated_cutoff_also_filters_pairs() {
    // 2.3 / 0.5 keeps four bins, so the effective cutoff is 2.0 and the pair at
    // 2.2 must not be counted.
    let frame = vec![
        ("Ar", [0.0, 0.0, 0.0]),
        ("Ar", [2.2, 0.0, 0.0]),
        ("Ar", [1.0, 0.0, 0.0]),
    ];
    let traj = build_traj(&[frame], None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.3, 0.5);
    let rdf = expect_rdf(run(&mut plan, &traj, FrameWindow::default()).unwrap());
    assert_eq!(rdf.cutoff, 2.0);
    assert_eq!(rdf.histogram.total(), 2);
    assert_eq!(rdf.histogram.counts()[2], 2);
    assert_eq!(rdf.histogram.dropped(), 0);
}

#[test]
fn histogram_accumulates_across_frames() {
    let frames = vec![pair_frame(), pair_frame(), pair_frame()];
    let traj = build_traj(&frames, None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.0, 0.5);
    let rdf = expect_rdf(run(&mut plan, &traj, FrameWindow::new(2, -1)).unwrap());
    assert_eq!(rdf.stats.frames(), 2);
    assert_eq!(rdf.histogram.counts()[2], 2);
}

#[test]
fn periodic_cutoff_is_clamped_not_rejected() {
    let frame = vec![
        ("O", [1.0, 1.0, 1.0]),
        ("O", [9.0, 1.0, 1.0]),
        ("O", [1.0, 4.0, 1.0]),
    ];
    let traj = build_traj(&[frame], Some([10.0, 10.0, 10.0]));
    let mut plan = RdfPlan::new(SpeciesPair::Mono("O".into()), 8.0, 0.5).with_pbc(true);
    let rdf = expect_rdf(run(&mut plan, &traj, FrameWindow::default()).unwrap());
    assert_eq!(rdf.clamped_from, Some(8.0));
    assert_eq!(rdf.cutoff, 5.0);
    assert_eq!(rdf.histogram.n_bins(), 10);
    // images: 2.0, 3.0 and sqrt(4 + 9)
    assert_eq!(rdf.histogram.total(), 3);
    assert_eq!(rdf.histogram.counts()[4], 1);
    assert_eq!(rdf.histogram.counts()[6], 1);
    assert_eq!(rdf.histogram.counts()[7], 1);
}

#[test]
fn periodic_multi_uses_cross_pair_normalization() {
    let frame = vec![
        ("Na", [1.0, 1.0, 1.0]),
        ("Cl", [2.0, 1.0, 1.0]),
        ("Cl", [9.5, 1.0, 1.0]),
    ];
    let traj = build_traj(&[frame.clone(), frame], Some([10.0, 10.0, 10.0]));
    let mut plan =
        RdfPlan::new(SpeciesPair::Multi("Na".into(), "Cl".into()), 4.0, 0.5).with_pbc(true);
    let rdf = expect_rdf(run(&mut plan, &traj, FrameWindow::default()).unwrap());
    assert_eq!(rdf.histogram.counts()[2], 2);
    assert_eq!(rdf.histogram.counts()[3], 2);
    let expected = rdf_values(
        &rdf.histogram,
        2,
        RdfNormalization::PeriodicMulti {
            volume: 1000.0,
            n_atoms1: 1,
            n_atoms2: 2,
        },
    )
    .unwrap();
    let bins: Vec<f64> = rdf
        .table
        .rows()
        .iter()
        .filter_map(|row| match *row {
            sdf_core::table::Row::Bin { value, .. } => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(bins, expected);
    assert_eq!(rdf.table.len(), rdf.histogram.n_bins() + 1);
}

#[test]
fn empty_window_reports_empty_sample() {
    let traj = build_traj(&[pair_frame(), pair_frame()], None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.0, 0.5);
    let err = run(&mut plan, &traj, FrameWindow::new(2, 1)).unwrap_err();
    assert!(matches!(err, SdfError::EmptySample(_)));
}

#[test]
fn window_past_the_end_is_range_error() {
    let traj = build_traj(&[pair_frame()], None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.0, 0.5);
    let err = run(&mut plan, &traj, FrameWindow::new(1, 5)).unwrap_err();
    assert!(matches!(err, SdfError::Range(_)));
}

#[test]
fn periodic_rdf_without_box_is_config_error() {
    let traj = build_traj(&[pair_frame()], None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.0, 0.5).with_pbc(true);
    let err = run(&mut plan, &traj, FrameWindow::default()).unwrap_err();
    assert!(matches!(err, SdfError::Config(_)));
}

#[test]
fn frames_without_matches_still_count() {
    let frames = vec![pair_frame(), vec![("Ne", [0.0, 0.0, 0.0]), ("Ne", [1.0, 0.0, 0.0])]];
    let traj = build_traj(&frames, None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.0, 0.5);
    let rdf = expect_rdf(run(&mut plan, &traj, FrameWindow::default()).unwrap());
    assert_eq!(rdf.stats.frames(), 2);
    assert_eq!(rdf.stats.population_sum(0), 2);
    assert_eq!(rdf.stats.average_population(0).unwrap(), 1.0);
    assert_eq!(rdf.histogram.total(), 1);
}

#[test]
fn slab_rdf_filters_by_height_and_uses_slab_volume() {
    let frame = vec![
        ("O", [1.0, 1.0, 2.0]),
        ("O", [9.0, 1.0, 2.5]),
        ("O", [1.0, 1.0, 7.0]),
    ];
    let traj = build_traj(&[frame], Some([10.0, 10.0, 20.0]));
    let slab = Slab::new(0.0, 5.0).unwrap();
    let mut plan = RdfPlan::new(SpeciesPair::Mono("O".into()), 4.0, 0.5)
        .with_pbc(true)
        .with_geometry(RdfGeometry::Slab(slab));
    let rdf = expect_rdf(run(&mut plan, &traj, FrameWindow::default()).unwrap());
    assert_eq!(rdf.stats.population_sum(0), 2);
    assert_eq!(rdf.histogram.total(), 1);
    let expected = rdf_values(
        &rdf.histogram,
        1,
        RdfNormalization::PeriodicMono {
            volume: 10.0 * 10.0 * 5.0,
            n_atoms: 2,
        },
    )
    .unwrap();
    let bin = rdf.histogram.bin_of((4.0f64 + 0.25).sqrt()).unwrap();
    match rdf.table.rows()[bin + 1] {
        sdf_core::table::Row::Bin { value, .. } => assert_eq!(value, expected[bin]),
        other => panic!("unexpected row {other:?}"),
    }
}

#[test]
fn normalizing_twice_gives_identical_rows() {
    let traj = build_traj(&[pair_frame(), pair_frame()], Some([6.0, 6.0, 6.0]));
    let mut first = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 3.0, 0.25).with_pbc(true);
    let mut second = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 3.0, 0.25).with_pbc(true);
    let a = expect_rdf(run(&mut first, &traj, FrameWindow::default()).unwrap());
    let b = expect_rdf(run(&mut second, &traj, FrameWindow::default()).unwrap());
    assert_eq!(a.table, b.table);
    let norm = RdfNormalization::PeriodicMono {
        volume: 216.0,
        n_atoms: 2,
    };
    assert_eq!(
        normalize_rdf(&a.histogram, 2, norm).unwrap(),
        normalize_rdf(&a.histogram, 2, norm).unwrap()
    );
    assert_eq!(normalize_rdf(&a.histogram, 2, norm).unwrap(), a.table);
}

#[test]
fn unknown_species_is_empty_sample() {
    let traj = build_traj(&[pair_frame(), pair_frame()], None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Xe".into()), 2.0, 0.5);
    match run(&mut plan, &traj, FrameWindow::default()).unwrap_err() {
        SdfError::EmptySample(msg) => assert!(msg.contains("Xe")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_second_species_is_empty_sample() {
    let traj = build_traj(&[pair_frame()], Some([10.0, 10.0, 10.0]));
    let mut plan =
        RdfPlan::new(SpeciesPair::Multi("Ar".into(), "Kr".into()), 2.0, 0.5).with_pbc(true);
    match run(&mut plan, &traj, FrameWindow::default()).unwrap_err() {
        SdfError::EmptySample(msg) => assert!(msg.contains("Kr")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn empty_slab_is_empty_sample() {
    let traj = build_traj(&[pair_frame()], Some([10.0, 10.0, 10.0]));
    let slab = Slab::new(2.0, 3.0).unwrap();
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.0, 0.5)
        .with_pbc(true)
        .with_geometry(RdfGeometry::Slab(slab));
    let err = run(&mut plan, &traj, FrameWindow::default()).unwrap_err();
    assert!(matches!(err, SdfError::EmptySample(_)));
}

#[test]
fn open_rdf_without_pairs_in_range_is_empty_sample() {
    let frame = vec![("Ar", [0.0, 0.0, 0.0]), ("Ar", [3.0, 0.0, 0.0])];
    let traj = build_traj(&[frame], None);
    let mut plan = RdfPlan::new(SpeciesPair::Mono("Ar".into()), 2.0, 0.5);
    let err = run(&mut plan, &traj, FrameWindow::default()).unwrap_err();
    assert!(matches!(err, SdfError::EmptySample(_)));
}

#[test]
fn open_rdf_ignores_group_size() {
    // Same close pair; the second trajectory adds an Ar atom far outside the
    // cutoff. Without a box only the frame count enters the normalization.
    let crowded = {
        let mut frame = pair_frame();
        frame.push(("Ar", [8.0, 8.0, 8.0]));
        frame
    };
    let small = build_traj(&[pair_frame()], Some([20.0, 20.0, 20.0]));
    let large = build_traj(&[crowded], Some([20.0, 20.0, 20.0]));
    let species = || SpeciesPair::Mono("Ar".into());

    let mut plan = RdfPlan::new(species(), 2.0, 0.5);
    let open_small = expect_rdf(run(&mut plan, &small, FrameWindow::default()).unwrap());
    let mut plan = RdfPlan::new(species(), 2.0, 0.5);
    let open_large = expect_rdf(run(&mut plan, &large, FrameWindow::default()).unwrap());
    assert_eq!(open_large.stats.last_population(0), 3);
    assert_eq!(open_small.histogram, open_large.histogram);
    assert_eq!(open_small.table, open_large.table);

    let mut plan = RdfPlan::new(species(), 2.0, 0.5).with_pbc(true);
    let pbc_small = expect_rdf(run(&mut plan, &small, FrameWindow::default()).unwrap());
    let mut plan = RdfPlan::new(species(), 2.0, 0.5).with_pbc(true);
    let pbc_large = expect_rdf(run(&mut plan, &large, FrameWindow::default()).unwrap());
    assert_eq!(pbc_small.histogram, pbc_large.histogram);
    assert_ne!(pbc_small.table, pbc_large.table);
}
