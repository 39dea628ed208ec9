//! The `Session` struct: commands, the tick loop, and the job state machine.

use gdd_core::{GeoPoint, JobId, LocationId, SimClock, SimConfig};
use gdd_graph::{GraphError, GraphStore, HubRouter};
use gdd_mobility::{ActiveRoute, ArrivalEvent, LegKind, MovementSimulator, Vehicle};

use crate::{
    Dispatcher, Job, JobSnapshot, JobStatus, Resource, RouteAssignment, SessionObserver,
    SessionSnapshot, SimError, SimResult, SnapshotPatch, VehicleMode, VehicleSnapshot,
};

// ── Transitions and actions ───────────────────────────────────────────────────

/// What an arrival did to the session.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Transition {
    /// Tank filled at a fuel stop.  `resumed` names the job that continues.
    Refueled { at: LocationId, resumed: Option<JobId> },
    /// The active job reached its destination.
    JobCompleted(JobId),
    /// A delivering leg ended with no matching in-progress job.
    Arrived(LocationId),
}

/// Follow-up work produced by an arrival and consumed by the tick loop.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// Re-run dispatch for the in-progress job from the current location.
    Redispatch(JobId),
}

/// Summary of one [`Session::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub travelled_m: f64,
    pub arrival:     Option<ArrivalEvent>,
    pub transition:  Option<Transition>,
    /// The leg committed by a follow-up dispatch, if any.
    pub next_leg:    Option<LegKind>,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One vehicle, at most one active job, and the graph it drives on.
///
/// All mutable state lives here and is changed only through the command
/// methods and [`tick`](Self::tick).  Invariants:
///
/// - `mode == Idle` exactly when `route` is `None`.
/// - At most one job is in progress.
/// - Fuel and durability stay within their tank sizes.
pub struct Session<R: HubRouter> {
    pub config:   SimConfig,
    pub graph:    GraphStore,
    pub router:   R,
    pub clock:    SimClock,
    pub vehicle:  Vehicle,
    pub job:      Option<Job>,
    pub mode:     VehicleMode,
    pub route:    Option<ActiveRoute>,
    /// Sum of payouts of completed jobs.
    pub earnings: f64,
    movement:     MovementSimulator,
    fuel_warned:  bool,
    wear_warned:  bool,
}

impl<R: HubRouter> Session<R> {
    /// A session with the vehicle parked at `start` with full tanks.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] for an invalid config, [`SimError::Graph`] if
    /// `start` is not a location of `graph`.
    pub fn new(config: SimConfig, graph: GraphStore, router: R, start: LocationId) -> SimResult<Self> {
        config.validate()?;
        let pos = graph
            .location(start)
            .map(|l| l.pos)
            .ok_or(GraphError::UnknownLocation(start))?;
        Ok(Self {
            vehicle: Vehicle::new(config.vehicle, start, pos),
            movement: MovementSimulator::from_config(&config.dispatch),
            config,
            graph,
            router,
            clock: SimClock::new(),
            job: None,
            mode: VehicleMode::Idle,
            route: None,
            earnings: 0.0,
            fuel_warned: false,
            wear_warned: false,
        })
    }

    pub fn dispatcher(&self) -> Dispatcher<'_, R> {
        Dispatcher::new(&self.graph, &self.router, &self.config)
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.mode == VehicleMode::Idle
    }

    /// The job currently in progress, if any.
    pub fn active_job(&self) -> Option<&Job> {
        self.job.as_ref().filter(|j| j.is_in_progress())
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Take an available job and dispatch the first leg.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidCommand`] if the vehicle is moving, another job is
    /// in progress, or `job` is not available.  Dispatch errors propagate.
    /// On any error the session is unchanged.
    pub fn accept_job<O: SessionObserver>(&mut self, mut job: Job, observer: &mut O) -> SimResult<()> {
        if !self.is_idle() {
            return Err(SimError::InvalidCommand(format!("vehicle is {}", self.mode)));
        }
        if let Some(active) = self.active_job() {
            return Err(SimError::InvalidCommand(format!("job {} already in progress", active.id)));
        }
        if job.status != JobStatus::Available {
            return Err(SimError::InvalidCommand(format!("job {} is not available", job.id)));
        }
        for loc in [job.origin, job.destination] {
            if self.graph.location(loc).is_none() {
                return Err(GraphError::UnknownLocation(loc).into());
            }
        }

        let assignment = self.dispatcher().dispatch(&self.vehicle, &job)?;
        tracing::info!(job = %job.id, leg = %assignment.leg, payout = job.payout, "job accepted");
        job.status = JobStatus::InProgress;
        self.job = Some(job);
        self.commit(assignment, observer);
        Ok(())
    }

    /// Drive to the nearest fuel stop.  Allowed only while idle.
    pub fn request_refuel<O: SessionObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if !self.is_idle() {
            return Err(SimError::InvalidCommand(format!("vehicle is {}", self.mode)));
        }
        let assignment = self.dispatcher().plan_refuel(&self.vehicle)?;
        self.commit(assignment, observer);
        Ok(())
    }

    /// Dispatch the in-progress job again after a failed follow-up dispatch.
    pub fn retry_job<O: SessionObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if !self.is_idle() {
            return Err(SimError::InvalidCommand(format!("vehicle is {}", self.mode)));
        }
        let job = self
            .active_job()
            .ok_or_else(|| SimError::InvalidCommand("no job in progress".into()))?;
        let assignment = self.dispatcher().dispatch(&self.vehicle, job)?;
        self.commit(assignment, observer);
        Ok(())
    }

    /// Drop the in-progress job.  The vehicle stops where it is and the job
    /// is handed back as available.
    pub fn abort_job<O: SessionObserver>(&mut self, observer: &mut O) -> SimResult<Job> {
        let Some(mut job) = self.job.take_if(|j| j.is_in_progress()) else {
            return Err(SimError::InvalidCommand("no job in progress".into()));
        };
        job.status = JobStatus::Available;
        self.route = None;
        self.mode = VehicleMode::Idle;
        tracing::info!(job = %job.id, "job aborted");
        observer.on_persist(&self.snapshot());
        Ok(job)
    }

    fn commit<O: SessionObserver>(&mut self, assignment: RouteAssignment, observer: &mut O) {
        tracing::debug!(
            leg = %assignment.leg,
            points = assignment.points.len(),
            fuel = assignment.estimated_fuel,
            "route committed"
        );
        self.mode = assignment.leg.into();
        let route = assignment.into_route();
        observer.on_route_committed(&route);
        self.route = Some(route);
        observer.on_persist(&self.snapshot());
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the session by `elapsed_secs` of simulated time.
    ///
    /// # Errors
    ///
    /// Only a failed follow-up dispatch after refuelling.  The arrival has
    /// already been applied by then: the vehicle is idle at the stop with a
    /// full tank and the job is still in progress, ready for
    /// [`retry_job`](Self::retry_job) or [`abort_job`](Self::abort_job).
    pub fn tick<O: SessionObserver>(&mut self, elapsed_secs: f64, observer: &mut O) -> SimResult<TickReport> {
        self.clock.advance(elapsed_secs);
        let mut report = TickReport::default();

        if let Some(route) = self.route.as_mut() {
            let step = self.movement.advance(&mut self.vehicle, route, elapsed_secs);
            report.travelled_m = step.travelled_m;
            report.arrival = step.arrival;
        }
        self.check_depletion(observer);
        observer.on_tick(&self.clock, &self.vehicle, self.mode);

        let Some(event) = report.arrival else {
            return Ok(report);
        };
        observer.on_arrival(&event, &self.vehicle);
        let (transition, actions) = self.handle_arrival(event);
        report.transition = Some(transition);
        if matches!(transition, Transition::JobCompleted(_)) {
            if let Some(job) = &self.job {
                observer.on_job_completed(job);
            }
        }
        observer.on_persist(&self.snapshot());

        for action in actions {
            report.next_leg = Some(self.apply(action, observer)?);
        }
        Ok(report)
    }

    /// The state machine: settle the finished route and say what follows.
    fn handle_arrival(&mut self, event: ArrivalEvent) -> (Transition, Vec<Action>) {
        self.route = None;
        self.mode = VehicleMode::Idle;
        self.vehicle.current_location = event.target;

        match event.leg {
            LegKind::Refueling => {
                self.vehicle.refuel();
                self.fuel_warned = false;
                let resumed = self.active_job().map(|j| j.id);
                tracing::info!(at = %event.target, fuel = self.vehicle.fuel, "refuelled");
                let actions = resumed.map(Action::Redispatch).into_iter().collect();
                (Transition::Refueled { at: event.target, resumed }, actions)
            }
            LegKind::Delivering => {
                let Some(job) = self.job.as_mut().filter(|j| {
                    j.status == JobStatus::InProgress && j.destination == event.target
                }) else {
                    return (Transition::Arrived(event.target), Vec::new());
                };
                job.status = JobStatus::Done;
                self.earnings += job.payout;
                tracing::info!(job = %job.id, payout = job.payout, earnings = self.earnings, "job completed");
                (Transition::JobCompleted(job.id), Vec::new())
            }
        }
    }

    fn apply<O: SessionObserver>(&mut self, action: Action, observer: &mut O) -> SimResult<LegKind> {
        match action {
            Action::Redispatch(id) => {
                let job = self
                    .active_job()
                    .filter(|j| j.id == id)
                    .ok_or_else(|| SimError::InvalidCommand(format!("job {id} is no longer in progress")))?;
                let assignment = match self.dispatcher().dispatch(&self.vehicle, job) {
                    Ok(a) => a,
                    Err(e) => {
                        tracing::error!(job = %id, error = %e, "follow-up dispatch failed");
                        return Err(e);
                    }
                };
                let leg = assignment.leg;
                self.commit(assignment, observer);
                Ok(leg)
            }
        }
    }

    fn check_depletion<O: SessionObserver>(&mut self, observer: &mut O) {
        if self.vehicle.is_out_of_fuel() && !self.fuel_warned {
            self.fuel_warned = true;
            tracing::warn!(pos = %self.vehicle.pos, "vehicle ran out of fuel");
            observer.on_resource_depleted(Resource::Fuel, &self.vehicle);
        }
        if self.vehicle.is_worn_out() && !self.wear_warned {
            self.wear_warned = true;
            tracing::warn!(pos = %self.vehicle.pos, "vehicle durability exhausted");
            observer.on_resource_depleted(Resource::Durability, &self.vehicle);
        }
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    fn location_key(&self, id: LocationId) -> String {
        self.graph
            .location(id)
            .map(|l| l.key.clone())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (route, route_index) = match &self.route {
            Some(r) => (r.points.iter().map(|p| p.to_lng_lat()).collect(), r.cursor),
            None => (Vec::new(), 0),
        };
        SessionSnapshot {
            vehicle: VehicleSnapshot {
                pos:  self.vehicle.pos.to_lng_lat(),
                fuel: self.vehicle.fuel,
                dur:  self.vehicle.durability,
                current_location_id: self.location_key(self.vehicle.current_location),
            },
            job: self.job.as_ref().map(|j| JobSnapshot {
                id:     j.id.0,
                from:   self.location_key(j.origin),
                to:     self.location_key(j.destination),
                payout: j.payout,
                status: j.status,
            }),
            mode: self.mode,
            route,
            route_index,
        }
    }

    /// Apply the well-typed fields of a stored snapshot.
    ///
    /// Fields that are absent, malformed, or refer to unknown locations keep
    /// their current value.  A moving mode is restored only together with a
    /// usable route; otherwise the vehicle comes back idle.
    pub fn restore(&mut self, patch: SnapshotPatch) {
        if patch.is_empty() {
            return;
        }
        if let Some(pos) = patch.pos {
            self.vehicle.pos = pos;
        }
        if let Some(fuel) = patch.fuel {
            self.vehicle.set_fuel(fuel);
        }
        if let Some(dur) = patch.dur {
            self.vehicle.set_durability(dur);
        }
        self.fuel_warned = self.vehicle.is_out_of_fuel();
        self.wear_warned = self.vehicle.is_worn_out();

        if let Some(key) = &patch.current_location_id {
            match self.graph.location_by_key(key) {
                Some(id) => self.vehicle.current_location = id,
                None => {
                    tracing::warn!(%key, "snapshot names an unknown location, using the nearest one");
                    if let Some(id) = self.graph.nearest_location(self.vehicle.pos) {
                        self.vehicle.current_location = id;
                    }
                }
            }
        }

        match patch.job {
            Some(None) => self.job = None,
            Some(Some(js)) => match self.job_from_snapshot(&js) {
                Some(job) => self.job = Some(job),
                None => tracing::warn!(job = js.id, "snapshot job refers to unknown locations, ignored"),
            },
            None => {}
        }

        if let Some(mode) = patch.mode {
            self.restore_route(mode, patch.route, patch.route_index);
        }
        tracing::info!(mode = %self.mode, fuel = self.vehicle.fuel, "session restored");
    }

    fn job_from_snapshot(&self, js: &JobSnapshot) -> Option<Job> {
        Some(Job {
            id:          JobId(js.id),
            origin:      self.graph.location_by_key(&js.from)?,
            destination: self.graph.location_by_key(&js.to)?,
            payout:      js.payout,
            status:      js.status,
        })
    }

    fn restore_route(&mut self, mode: VehicleMode, points: Option<Vec<GeoPoint>>, index: Option<usize>) {
        let Some(leg) = mode.leg() else {
            self.mode = VehicleMode::Idle;
            self.route = None;
            return;
        };
        let points = match points {
            Some(p) if p.len() >= 2 => p,
            _ => {
                tracing::warn!(%mode, "snapshot route unusable, vehicle left idle");
                self.mode = VehicleMode::Idle;
                self.route = None;
                return;
            }
        };

        let end = points[points.len() - 1];
        let job_target = self
            .active_job()
            .map(|j| j.destination)
            .filter(|_| leg == LegKind::Delivering);
        let Some(target) = job_target.or_else(|| self.graph.nearest_location(end)) else {
            self.mode = VehicleMode::Idle;
            self.route = None;
            return;
        };

        let cursor = index.unwrap_or(0).min(points.len() - 1);
        let mut route = ActiveRoute::new(points, leg, target);
        route.cursor = cursor;
        self.route = Some(route);
        self.mode = mode;
    }
}
