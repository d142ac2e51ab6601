use crate::display::labels::{
    altitude_axis_label, field_colorbar_label, generate_field_name, generate_title,
    generate_vpt_title, horizontal_axis_label,
};
use crate::display::limits::{parse_vmin_vmax, FieldLimits};
use crate::display::options::GridOptions;
use crate::display::state::{AttitudeVectors, DisplayState, GeoFrame};
use crate::math::edges::edges_2d;
use crate::math::geometry::CartesianGrid;
use crate::prelude::{
    Colorbar, ColorbarOrientation, DisplayError, DisplayResult, MaskedGrid, MeshAxes, MeshPlot, PlotSurface,
};
use crate::radar::{AirborneRadar, ScanType};
use crate::telemetry::{LogManager, Metrics, MetricsRecorder};

/// Display for creating plots from an airborne radar volume.
///
/// Attitude and geolocation are captured when the display is built; gate
/// coordinates are recomputed for every plot. Each plot call appends to
/// `plots`/`plot_vars` and, with a colorbar, to `colorbars`.
pub struct RadarDisplayAirborne<'r> {
    radar: &'r AirborneRadar,
    state: DisplayState,
    limits: FieldLimits,
    plots: Vec<MeshPlot>,
    plot_vars: Vec<String>,
    colorbars: Vec<Colorbar>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl<'r> RadarDisplayAirborne<'r> {
    /// `shift` is a horizontal offset in meters applied to every gate.
    pub fn new(radar: &'r AirborneRadar, shift: (f64, f64)) -> DisplayResult<Self> {
        let state = DisplayState::new(radar, shift)?;
        let logger = LogManager::new("airborne-display");
        logger.trace(&format!(
            "display for {} in {:?} frame, shift {:?}",
            if state.radar_name.is_empty() { "unnamed radar" } else { state.radar_name.as_str() },
            state.frame,
            shift
        ));
        Ok(Self {
            radar,
            state,
            limits: FieldLimits::default(),
            plots: Vec::new(),
            plot_vars: Vec::new(),
            colorbars: Vec::new(),
            logger,
            metrics: MetricsRecorder::new(),
        })
    }

    /// Overrides the frame chosen from the platform type.
    pub fn with_frame(mut self, frame: GeoFrame) -> Self {
        self.state.frame = frame;
        self
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn attitude(&self) -> &AttitudeVectors {
        &self.state.attitude
    }

    pub fn origin(&self) -> &str {
        &self.state.origin
    }

    pub fn loc(&self) -> (f64, f64) {
        self.state.loc
    }

    pub fn plots(&self) -> &[MeshPlot] {
        &self.plots
    }

    pub fn plot_vars(&self) -> &[String] {
        &self.plot_vars
    }

    pub fn colorbars(&self) -> &[Colorbar] {
        &self.colorbars
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    pub fn scan_type(&self) -> DisplayResult<ScanType> {
        self.radar.scan_type.parse()
    }

    /// Plots `field` with the renderer suited to the volume's scan type:
    /// plan view for PPI, sweep grid for RHI and VPT.
    pub fn plot<S>(
        &mut self,
        field: &str,
        sweep: usize,
        options: &GridOptions,
        surface: &mut S,
    ) -> DisplayResult<()>
    where
        S: PlotSurface + ?Sized,
    {
        match self.scan_type()? {
            ScanType::Ppi => self.plot_ppi(field, sweep, options, surface),
            ScanType::Rhi | ScanType::Vpt => self.plot_sweep_grid(field, sweep, options, surface),
        }
    }

    /// Plan view of a sweep, x against y.
    pub fn plot_ppi<S>(
        &mut self,
        field: &str,
        sweep: usize,
        options: &GridOptions,
        surface: &mut S,
    ) -> DisplayResult<()>
    where
        S: PlotSurface + ?Sized,
    {
        self.plot_mesh(field, sweep, options, MeshAxes::PlanXy, surface)
    }

    /// Vertical section of a sweep, x against z.
    pub fn plot_sweep_grid<S>(
        &mut self,
        field: &str,
        sweep: usize,
        options: &GridOptions,
        surface: &mut S,
    ) -> DisplayResult<()>
    where
        S: PlotSurface + ?Sized,
    {
        self.plot_mesh(field, sweep, options, MeshAxes::SectionXz, surface)
    }

    fn plot_mesh<S>(
        &mut self,
        field: &str,
        sweep: usize,
        options: &GridOptions,
        axes: MeshAxes,
        surface: &mut S,
    ) -> DisplayResult<()>
    where
        S: PlotSurface + ?Sized,
    {
        let field_data = self.radar.field(field)?;
        let mut data = self.get_data(field, sweep, options)?;
        let (vmin, vmax) = parse_vmin_vmax(
            field,
            field_data,
            &self.limits,
            data.values.iter(),
            options.vmin,
            options.vmax,
        )?;
        let coords = self.get_coords(sweep, options.edges, options.filter_transitions)?;

        if options.mask_outside {
            data.mask_invalid();
            data.mask_outside(vmin, vmax);
        }

        let (x, y) = match axes {
            MeshAxes::PlanXy => (coords.x, coords.y),
            MeshAxes::SectionXz => (coords.x, coords.z),
        };
        let mesh = MeshPlot {
            field: field.to_string(),
            axes,
            x,
            y,
            data,
            vmin,
            vmax,
            cmap: options.cmap.clone(),
        };
        surface.pcolormesh(&mesh)?;
        let masked = mesh.data.masked_count();
        self.metrics.record_mesh(masked);
        self.logger.record(&format!(
            "{field} sweep {sweep}: {:?} cells, {masked} masked, limits {vmin}..{vmax}",
            mesh.cell_dim()
        ));

        if options.title_flag {
            self.set_title(field, sweep, options.title.as_deref(), surface)?;
        }
        if options.axislabels_flag {
            let (xlabel, ylabel) = &options.axislabels;
            match xlabel {
                Some(label) => surface.set_xlabel(label),
                None => self.label_xaxis_x(surface),
            }
            match (ylabel, axes) {
                (Some(label), _) => surface.set_ylabel(label),
                (None, MeshAxes::PlanXy) => self.label_yaxis_y(surface),
                (None, MeshAxes::SectionXz) => self.label_yaxis_z(surface),
            }
        }

        self.plots.push(mesh);
        self.plot_vars.push(field.to_string());

        if options.colorbar_flag {
            let index = self.plots.len() - 1;
            self.plot_colorbar(
                index,
                options.colorbar_label.as_deref(),
                options.colorbar_orient,
                Some(field),
                surface,
            )?;
        }
        Ok(())
    }

    /// Adds a colorbar for the plot at `mappable` (an index into `plots`).
    ///
    /// Without a label one is generated from `field`, or left empty when no
    /// field is given.
    pub fn plot_colorbar<S>(
        &mut self,
        mappable: usize,
        label: Option<&str>,
        orient: Option<ColorbarOrientation>,
        field: Option<&str>,
        surface: &mut S,
    ) -> DisplayResult<()>
    where
        S: PlotSurface + ?Sized,
    {
        let mesh = self.plots.get(mappable).ok_or_else(|| {
            DisplayError::InvalidInput(format!(
                "no plot {mappable} to attach a colorbar to"
            ))
        })?;
        let label = match (label, field) {
            (Some(label), _) => label.to_string(),
            (None, Some(field)) => field_colorbar_label(field, self.radar.field(field)?),
            (None, None) => String::new(),
        };
        let colorbar = Colorbar {
            field: field.map(str::to_string),
            label,
            orientation: orient.unwrap_or_default(),
            vmin: mesh.vmin,
            vmax: mesh.vmax,
            cmap: mesh.cmap.clone(),
        };
        surface.colorbar(&colorbar)?;
        self.metrics.record_colorbar();
        self.colorbars.push(colorbar);
        Ok(())
    }

    /// Sets the given title, or one generated from the radar, sweep and field.
    pub fn set_title<S>(
        &self,
        field: &str,
        sweep: usize,
        title: Option<&str>,
        surface: &mut S,
    ) -> DisplayResult<()>
    where
        S: PlotSurface + ?Sized,
    {
        let title = match title {
            Some(title) => title.to_string(),
            None => self.generate_title(field, sweep)?,
        };
        surface.set_title(&title);
        Ok(())
    }

    pub fn generate_title(&self, field: &str, sweep: usize) -> DisplayResult<String> {
        let field_name = generate_field_name(field, self.radar.field(field)?);
        let radar_name = &self.state.radar_name;
        let time_begin = &self.radar.time_begin;
        if matches!(self.scan_type(), Ok(ScanType::Vpt)) {
            return Ok(generate_vpt_title(radar_name, time_begin, &field_name));
        }
        let fixed_angle = self
            .radar
            .fixed_angle
            .get(sweep)
            .copied()
            .unwrap_or(self.state.attitude.fixed_angle);
        Ok(generate_title(radar_name, fixed_angle, time_begin, &field_name))
    }

    pub fn label_xaxis_x<S: PlotSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_xlabel(&horizontal_axis_label(&self.state.origin));
    }

    pub fn label_yaxis_y<S: PlotSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_ylabel(&horizontal_axis_label(&self.state.origin));
    }

    pub fn label_yaxis_z<S: PlotSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_ylabel(&altitude_axis_label());
    }

    /// Sweep data with the mask field applied and transition rays removed.
    fn get_data(&self, field: &str, sweep: usize, options: &GridOptions) -> DisplayResult<MaskedGrid> {
        let mut data = MaskedGrid::new(self.radar.sweep_data(field, sweep)?);
        if let Some((mask_field, mask_value)) = &options.mask_tuple {
            let mask_data = self.radar.sweep_data(mask_field, sweep)?;
            data.mask_where_below(mask_data.view(), *mask_value)?;
        }
        if options.filter_transitions {
            let steady = self.radar.steady_rays(sweep)?;
            data = data.select_rows(&steady);
        }
        Ok(data)
    }

    /// Gate coordinates of a sweep, as corners when `edges` is set.
    fn get_coords(
        &self,
        sweep: usize,
        edges: bool,
        filter_transitions: bool,
    ) -> DisplayResult<CartesianGrid> {
        let rays = self.radar.get_slice(sweep)?;
        let mut coords = self.state.georeference(self.radar, rays)?;
        if filter_transitions {
            let steady = self.radar.steady_rays(sweep)?;
            coords = coords.select_rays(&steady);
        }
        if edges {
            coords = CartesianGrid {
                x: edges_2d(coords.x.view()),
                y: edges_2d(coords.y.view()),
                z: edges_2d(coords.z.view()),
            };
        }
        Ok(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::colormap::Colormap;
    use crate::radar::sweep::tests::sample_radar;
    use crate::test_helpers::assert_almost_eq;

    /// Surface double that records what the display asked it to draw.
    #[derive(Default)]
    struct RecordingSurface {
        meshes: Vec<MeshPlot>,
        titles: Vec<String>,
        xlabels: Vec<String>,
        ylabels: Vec<String>,
        colorbars: Vec<Colorbar>,
    }

    impl PlotSurface for RecordingSurface {
        fn pcolormesh(&mut self, mesh: &MeshPlot) -> DisplayResult<()> {
            self.meshes.push(mesh.clone());
            Ok(())
        }

        fn set_title(&mut self, title: &str) {
            self.titles.push(title.to_string());
        }

        fn set_xlabel(&mut self, label: &str) {
            self.xlabels.push(label.to_string());
        }

        fn set_ylabel(&mut self, label: &str) {
            self.ylabels.push(label.to_string());
        }

        fn colorbar(&mut self, colorbar: &Colorbar) -> DisplayResult<()> {
            self.colorbars.push(colorbar.clone());
            Ok(())
        }
    }

    #[test]
    fn rhi_plot_draws_section_with_decorations() {
        let radar = sample_radar();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        display
            .plot("reflectivity", 0, &GridOptions::default(), &mut surface)
            .unwrap();

        let mesh = &surface.meshes[0];
        assert_eq!(mesh.axes, MeshAxes::SectionXz);
        assert_eq!(mesh.x.dim(), (4, 5));
        assert_eq!(mesh.data.dim(), (3, 4));
        assert_eq!((mesh.vmin, mesh.vmax), (-30.0, 75.0));
        assert_eq!(
            surface.titles,
            vec!["TDR -20.0 Deg. 2013-06-10T12:30:05Z \nEquivalent reflectivity factor"]
        );
        assert_eq!(surface.xlabels, vec!["Horizontal distance from radar (km)"]);
        assert_eq!(surface.ylabels, vec!["Altitude (km)"]);
        assert_eq!(surface.colorbars[0].label, "equivalent reflectivity factor (dBZ)");
        assert_eq!(
            surface.colorbars[0].orientation,
            ColorbarOrientation::Vertical
        );

        assert_eq!(display.plot_vars(), ["reflectivity".to_string()]);
        assert_eq!(display.plots().len(), 1);
        assert_eq!(display.colorbars().len(), 1);
        assert_eq!(display.metrics().meshes, 1);
    }

    #[test]
    fn ppi_plot_uses_plan_axes() {
        let mut radar = sample_radar();
        radar.scan_type = "ppi".into();
        let mut display = RadarDisplayAirborne::new(&radar, (500.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        display
            .plot("reflectivity", 0, &GridOptions::default(), &mut surface)
            .unwrap();
        assert_eq!(surface.meshes[0].axes, MeshAxes::PlanXy);
        assert_eq!(
            surface.ylabels,
            vec!["Horizontal distance from origin (km)"]
        );
    }

    #[test]
    fn belly_ppi_plots_plan_view_with_shift() {
        let mut radar = sample_radar();
        radar.scan_type = "ppi".into();
        radar.metadata.platform_type = Some("aircraft_belly".into());
        let mut display = RadarDisplayAirborne::new(&radar, (2_000.0, 1_000.0)).unwrap();
        assert_eq!(display.state().frame, GeoFrame::Belly);
        let mut surface = RecordingSurface::default();
        let options = GridOptions {
            edges: false,
            ..GridOptions::bare()
        };
        display
            .plot("reflectivity", 0, &options, &mut surface)
            .unwrap();
        let mesh = &display.plots()[0];
        assert_eq!(mesh.axes, MeshAxes::PlanXy);
        assert_eq!(mesh.x.dim(), (3, 4));
        // azimuth 0 runs north, azimuth 90 runs east
        assert_almost_eq!(mesh.x[(0, 3)], 2_000.0, 1e-6);
        assert_almost_eq!(mesh.y[(0, 3)], 1_600.0, 1e-6);
        assert_almost_eq!(mesh.x[(1, 0)], 2_150.0, 1e-6);
        assert_almost_eq!(mesh.y[(1, 0)], 1_000.0, 1e-6);
    }

    #[test]
    fn unknown_scan_type_is_an_error() {
        let mut radar = sample_radar();
        radar.scan_type = "sector".into();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        let err = display
            .plot("reflectivity", 0, &GridOptions::default(), &mut surface)
            .unwrap_err();
        assert_eq!(err, DisplayError::UnknownScanType("sector".into()));
        assert_eq!(err.to_string(), "unknown scan_type sector");
        assert!(surface.meshes.is_empty());
        assert!(display.plots().is_empty());
    }

    #[test]
    fn mask_outside_leaves_only_values_within_limits() {
        let radar = sample_radar();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        let options = GridOptions {
            vmin: Some(12.0),
            vmax: Some(21.0),
            ..GridOptions::bare()
        };
        display
            .plot_sweep_grid("reflectivity", 0, &options, &mut surface)
            .unwrap();
        let mesh = &display.plots()[0];
        let visible = mesh.data.unmasked().collect::<Vec<_>>();
        assert_eq!(visible, vec![12.0, 13.0, 20.0, 21.0]);
        assert!(visible.iter().all(|v| (12.0..=21.0).contains(v)));
        assert_eq!(display.metrics().masked_gates, 8);
    }

    #[test]
    fn without_mask_outside_every_gate_is_kept() {
        let radar = sample_radar();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        let options = GridOptions {
            vmin: Some(12.0),
            vmax: Some(21.0),
            mask_outside: false,
            ..GridOptions::bare()
        };
        display
            .plot_sweep_grid("reflectivity", 0, &options, &mut surface)
            .unwrap();
        assert_eq!(display.plots()[0].data.masked_count(), 0);
    }

    #[test]
    fn mask_tuple_hides_low_quality_gates() {
        let radar = sample_radar();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        let options = GridOptions {
            mask_tuple: Some(("ncp".into(), 0.5)),
            vmin: Some(-100.0),
            vmax: Some(100.0),
            ..GridOptions::bare()
        };
        display
            .plot_sweep_grid("reflectivity", 0, &options, &mut surface)
            .unwrap();
        let mesh = &display.plots()[0];
        // ncp is 0.0 and 0.3 in the first two gates of every ray
        for ray in 0..3 {
            assert_eq!(mesh.data.get(ray, 0), None);
            assert_eq!(mesh.data.get(ray, 1), None);
            assert!(mesh.data.get(ray, 2).is_some());
        }
    }

    #[test]
    fn transition_rays_are_filtered_from_data_and_coordinates() {
        let radar = sample_radar();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        let filtered = GridOptions {
            edges: false,
            ..GridOptions::bare()
        };
        display
            .plot_sweep_grid("reflectivity", 1, &filtered, &mut surface)
            .unwrap();
        let mesh = &display.plots()[0];
        assert_eq!(mesh.data.dim(), (2, 4));
        assert_eq!(mesh.x.dim(), (2, 4));
        // first kept ray is the one rotated 90 degrees
        assert_almost_eq!(mesh.x[(0, 0)], 150.0, 1e-9);

        let unfiltered = GridOptions {
            filter_transitions: false,
            ..filtered
        };
        display
            .plot_sweep_grid("reflectivity", 1, &unfiltered, &mut surface)
            .unwrap();
        assert_eq!(display.plots()[1].data.dim(), (3, 4));
        assert_eq!(display.plot_vars().len(), 2);
    }

    #[test]
    fn explicit_title_labels_and_colorbar_options_win() {
        let radar = sample_radar();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        let options = GridOptions {
            title: Some("Eyewall".into()),
            axislabels: (Some("Across track".into()), None),
            colorbar_label: Some("dBZ".into()),
            colorbar_orient: Some(ColorbarOrientation::Horizontal),
            cmap: Colormap::Viridis,
            ..Default::default()
        };
        display
            .plot_sweep_grid("reflectivity", 0, &options, &mut surface)
            .unwrap();
        assert_eq!(surface.titles, vec!["Eyewall"]);
        assert_eq!(surface.xlabels, vec!["Across track"]);
        assert_eq!(surface.ylabels, vec!["Altitude (km)"]);
        let colorbar = &display.colorbars()[0];
        assert_eq!(colorbar.label, "dBZ");
        assert_eq!(colorbar.orientation, ColorbarOrientation::Horizontal);
        assert_eq!(colorbar.cmap, Colormap::Viridis);
    }

    #[test]
    fn vpt_title_omits_fixed_angle() {
        let mut radar = sample_radar();
        radar.scan_type = "vpt".into();
        let display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        assert_eq!(
            display.generate_title("reflectivity", 0).unwrap(),
            "TDR 2013-06-10T12:30:05Z \nEquivalent reflectivity factor"
        );
    }

    #[test]
    fn missing_field_and_sweep_propagate() {
        let radar = sample_radar();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        assert_eq!(
            display
                .plot("velocity", 0, &GridOptions::default(), &mut surface)
                .unwrap_err(),
            DisplayError::MissingField("velocity".into())
        );
        assert!(matches!(
            display.plot("reflectivity", 7, &GridOptions::default(), &mut surface),
            Err(DisplayError::SweepOutOfRange { sweep: 7, .. })
        ));
    }

    #[test]
    fn colorbar_without_field_has_empty_label() {
        let radar = sample_radar();
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0)).unwrap();
        let mut surface = RecordingSurface::default();
        display
            .plot_sweep_grid("reflectivity", 0, &GridOptions::bare(), &mut surface)
            .unwrap();
        display
            .plot_colorbar(0, None, None, None, &mut surface)
            .unwrap();
        assert_eq!(surface.colorbars[0].label, "");
        assert!(display.plot_colorbar(3, None, None, None, &mut surface).is_err());
    }

    #[test]
    fn earth_frame_rotates_with_heading() {
        let mut radar = sample_radar();
        radar.heading = vec![90.0; 6];
        let mut display = RadarDisplayAirborne::new(&radar, (0.0, 0.0))
            .unwrap()
            .with_frame(GeoFrame::EarthRelative);
        let mut surface = RecordingSurface::default();
        let options = GridOptions {
            edges: false,
            filter_transitions: false,
            ..GridOptions::bare()
        };
        display
            .plot_ppi("reflectivity", 0, &options, &mut surface)
            .unwrap();
        let mesh = &display.plots()[0];
        // rotation 90 points right of track; heading east turns that south
        assert_almost_eq!(mesh.x[(1, 0)], 0.0, 1e-9);
        assert_almost_eq!(mesh.y[(1, 0)], -150.0, 1e-9);
    }
}
