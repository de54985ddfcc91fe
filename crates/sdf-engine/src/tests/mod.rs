use super::*;
use sdf_core::error::SdfError;
use sdf_core::frame::{Slab, Trajectory, TrajectoryBuilder};
use sdf_core::geom::Vec3;
use sdf_core::pbc::OrthoBox;

mod rdf;

type AtomRow = (&'static str, [f64; 3]);

fn build_traj(frames: &[Vec<AtomRow>], box_: Option<[f64; 3]>) -> Trajectory {
    let mut builder = TrajectoryBuilder::new();
    builder.set_box(box_.map(|[lx, ly, lz]| OrthoBox::new(lx, ly, lz).unwrap()));
    for frame in frames {
        builder.start_frame().unwrap();
        for &(label, pos) in frame {
            builder.push_atom(label, Vec3::from_array(pos));
        }
    }
    builder.finish().unwrap()
}

fn run(
    plan: &mut dyn Plan,
    traj: &Trajectory,
    window: FrameWindow,
) -> sdf_core::SdfResult<PlanOutput> {
    Executor::new().with_window(window).run_plan(plan, traj)
}

fn expect_rdf(out: PlanOutput) -> RdfOutput {
    match out {
        PlanOutput::Rdf(rdf) => rdf,
        other => panic!("unexpected output {other:?}"),
    }
}
